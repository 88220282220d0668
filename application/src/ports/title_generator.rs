//! Title generator port
//!
//! A conversation gets a short title derived from its first question. Title
//! generation never fails a run: implementations fall back to
//! [`DEFAULT_TITLE`].

use async_trait::async_trait;

/// Title used when no better one can be produced.
pub const DEFAULT_TITLE: &str = "New Conversation";

/// Produces a short conversation title for a question
#[async_trait]
pub trait TitleGenerator: Send + Sync {
    async fn generate(&self, question: &str) -> String;
}
