//! Outcome of a single model invocation.

use serde::{Deserialize, Serialize};

/// Classified reason an invocation produced no usable text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The call exceeded its time budget.
    Timeout,
    /// The provider refused the call for quota reasons (HTTP 429 or equivalent).
    RateLimit,
    /// Any other non-success HTTP status.
    HttpError,
    /// The provider answered 2xx but embedded an error object in the body.
    ApiError,
    /// The provider answered without any generated text.
    EmptyResponse,
    /// Anything the invoker could not classify more precisely.
    Unknown,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Timeout => "timeout",
            FailureKind::RateLimit => "rate_limit",
            FailureKind::HttpError => "http_error",
            FailureKind::ApiError => "api_error",
            FailureKind::EmptyResponse => "empty_response",
            FailureKind::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one invocation: generated text or a classified failure.
///
/// Serialized untagged so that a response entry reads either
/// `{"text": ...}` or `{"error_kind": ..., "error": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelOutcome {
    Success {
        text: String,
    },
    Failure {
        #[serde(rename = "error_kind")]
        kind: FailureKind,
        #[serde(rename = "error")]
        message: String,
    },
}

impl ModelOutcome {
    pub fn success(text: impl Into<String>) -> Self {
        ModelOutcome::Success { text: text.into() }
    }

    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        ModelOutcome::Failure {
            kind,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ModelOutcome::Success { .. })
    }

    /// Generated text, if the invocation succeeded.
    pub fn text(&self) -> Option<&str> {
        match self {
            ModelOutcome::Success { text } => Some(text),
            ModelOutcome::Failure { .. } => None,
        }
    }

    /// Failure classification, if the invocation failed.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            ModelOutcome::Success { .. } => None,
            ModelOutcome::Failure { kind, .. } => Some(*kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_serializes_text_only() {
        let json = serde_json::to_value(ModelOutcome::success("42")).unwrap();
        assert_eq!(json, serde_json::json!({ "text": "42" }));
    }

    #[test]
    fn test_failure_serializes_kind_and_message() {
        let outcome = ModelOutcome::failure(FailureKind::RateLimit, "HTTP 429: slow down");
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "error_kind": "rate_limit", "error": "HTTP 429: slow down" })
        );
        let back: ModelOutcome = serde_json::from_value(json).unwrap();
        assert_eq!(back, outcome);
    }

    #[test]
    fn test_accessors() {
        let ok = ModelOutcome::success("hi");
        assert!(ok.is_success());
        assert_eq!(ok.text(), Some("hi"));
        assert_eq!(ok.failure_kind(), None);

        let err = ModelOutcome::failure(FailureKind::Timeout, "Timeout (120s)");
        assert!(!err.is_success());
        assert_eq!(err.text(), None);
        assert_eq!(err.failure_kind(), Some(FailureKind::Timeout));
    }
}
