//! Model invoker port
//!
//! Defines how the council talks to a model provider. One call, one prompt,
//! one [`ModelOutcome`]. Provider failures are data, not errors: every
//! failure is classified into a [`FailureKind`] so the fallback policy can
//! react to it.

use async_trait::async_trait;
use council_domain::{FailureKind, Model, ModelOutcome, Prompt};
use std::time::Duration;

/// Gateway for single-shot model calls
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    /// Send `prompt` to `model` and classify the result.
    ///
    /// `timeout` is the per-call budget. Implementations should honor it,
    /// but callers enforce it as well through [`invoke_with_deadline`].
    async fn invoke(&self, model: &Model, prompt: &Prompt, timeout: Duration) -> ModelOutcome;
}

/// Invoke a model and turn an overrun of `timeout` into a
/// [`FailureKind::Timeout`] outcome.
pub async fn invoke_with_deadline<I: ModelInvoker + ?Sized>(
    invoker: &I,
    model: &Model,
    prompt: &Prompt,
    timeout: Duration,
) -> ModelOutcome {
    match tokio::time::timeout(timeout, invoker.invoke(model, prompt, timeout)).await {
        Ok(outcome) => outcome,
        Err(_) => ModelOutcome::failure(
            FailureKind::Timeout,
            format!("Timeout ({}s)", timeout.as_secs()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowInvoker;

    #[async_trait]
    impl ModelInvoker for SlowInvoker {
        async fn invoke(&self, _model: &Model, _prompt: &Prompt, _timeout: Duration) -> ModelOutcome {
            tokio::time::sleep(Duration::from_secs(600)).await;
            ModelOutcome::success("too late")
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_overrun_becomes_timeout_failure() {
        let model = Model::new("slow/model").unwrap();
        let outcome = invoke_with_deadline(
            &SlowInvoker,
            &model,
            &Prompt::user_only("hi"),
            Duration::from_secs(120),
        )
        .await;

        assert_eq!(outcome.failure_kind(), Some(FailureKind::Timeout));
        assert_eq!(
            outcome,
            ModelOutcome::failure(FailureKind::Timeout, "Timeout (120s)")
        );
    }
}
