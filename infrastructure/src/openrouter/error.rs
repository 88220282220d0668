//! OpenRouter adapter errors.
//!
//! Model calls never surface these: [`OpenRouterInvoker`](super::OpenRouterInvoker)
//! folds call failures into a classified
//! [`ModelOutcome`](council_domain::ModelOutcome). They cover construction
//! and the model catalogue only.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InvokerError {
    /// The API key environment variable is unset or empty.
    #[error("OpenRouter API key not configured: set the {0} environment variable")]
    MissingApiKey(String),

    /// The provider answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response could not be parsed.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// An HTTP-level error from reqwest.
    #[error("http error: {0}")]
    Client(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, InvokerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_key_names_variable() {
        let err = InvokerError::MissingApiKey("OPENROUTER_API_KEY".into());
        assert_eq!(
            err.to_string(),
            "OpenRouter API key not configured: set the OPENROUTER_API_KEY environment variable"
        );
    }

    #[test]
    fn display_http() {
        let err = InvokerError::Http {
            status: 503,
            body: "unavailable".into(),
        };
        assert_eq!(err.to_string(), "HTTP 503: unavailable");
    }
}
