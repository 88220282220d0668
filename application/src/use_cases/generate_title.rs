//! Conversation titles from a fast model.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use council_domain::{Model, ModelOutcome, PromptTemplate};
use tracing::{debug, warn};

use crate::config::CouncilPolicy;
use crate::ports::model_invoker::{ModelInvoker, invoke_with_deadline};
use crate::ports::title_generator::{DEFAULT_TITLE, TitleGenerator};

const MAX_TITLE_CHARS: usize = 50;

/// [`TitleGenerator`] that asks a model for the title
pub struct ModelTitleGenerator<I: ModelInvoker + 'static> {
    invoker: Arc<I>,
    model: Model,
    timeout: Duration,
}

impl<I: ModelInvoker + 'static> ModelTitleGenerator<I> {
    pub fn new(invoker: Arc<I>, model: Model, timeout: Duration) -> Self {
        Self {
            invoker,
            model,
            timeout,
        }
    }

    /// Use the title model and budget of `policy`.
    pub fn from_policy(invoker: Arc<I>, policy: &CouncilPolicy) -> Self {
        Self::new(invoker, policy.title_model.clone(), policy.title_timeout)
    }
}

#[async_trait]
impl<I: ModelInvoker + 'static> TitleGenerator for ModelTitleGenerator<I> {
    async fn generate(&self, question: &str) -> String {
        let prompt = PromptTemplate::title(question);
        match invoke_with_deadline(self.invoker.as_ref(), &self.model, &prompt, self.timeout).await {
            ModelOutcome::Success { text } => {
                let title = clean_title(&text);
                debug!("Generated title: {}", title);
                title
            }
            ModelOutcome::Failure { kind, message } => {
                warn!("Title generation failed ({}): {}", kind, message);
                DEFAULT_TITLE.to_string()
            }
        }
    }
}

/// Strip surrounding quotes and cap the title at 50 characters.
pub fn clean_title(raw: &str) -> String {
    let title = raw.trim().trim_matches(|c| c == '"' || c == '\'').trim();
    if title.is_empty() {
        return DEFAULT_TITLE.to_string();
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        let mut short: String = title.chars().take(MAX_TITLE_CHARS - 3).collect();
        short.push_str("...");
        return short;
    }
    title.to_string()
}
