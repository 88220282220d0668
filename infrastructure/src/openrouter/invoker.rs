//! OpenRouter model invoker.
//!
//! [`OpenRouterInvoker`] implements the [`ModelInvoker`] port against any
//! endpoint that speaks the OpenAI chat completion format, OpenRouter
//! being the default. Every failure is classified:
//!
//! | Situation                               | Kind             |
//! |-----------------------------------------|------------------|
//! | request exceeded its budget             | `timeout`        |
//! | HTTP 429                                | `rate_limit`     |
//! | any other non-2xx status                | `http_error`     |
//! | `error` object in a 2xx body, code 429  | `rate_limit`     |
//! | `error` object in a 2xx body, otherwise | `api_error`      |
//! | no choices, or blank content            | `empty_response` |
//! | anything else                           | `unknown`        |

use std::time::Duration;

use async_trait::async_trait;
use council_application::ports::model_invoker::ModelInvoker;
use council_domain::{FailureKind, Model, ModelOutcome, Prompt};
use tracing::{debug, warn};

use super::error::{InvokerError, Result};
use super::types::{ChatRequest, ChatResponse, ErrorEnvelope, ModelsResponse};

/// Default OpenAI-compatible base URL.
pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1";

/// Default environment variable holding the API key.
pub const DEFAULT_API_KEY_ENV: &str = "OPENROUTER_API_KEY";

const BODY_EXCERPT_CHARS: usize = 200;

/// A zero-cost model listed in the provider catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreeModel {
    pub id: String,
    pub name: String,
    pub context_length: Option<u64>,
}

/// [`ModelInvoker`] backed by an OpenAI-compatible HTTP API
pub struct OpenRouterInvoker {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenRouterInvoker {
    /// Create an invoker with an explicit API key.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("llm-council/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    /// Create an invoker reading the API key from `api_key_env`.
    pub fn from_env(base_url: impl Into<String>, api_key_env: &str) -> Result<Self> {
        let api_key = std::env::var(api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| InvokerError::MissingApiKey(api_key_env.to_string()))?;
        Self::new(base_url, api_key)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    /// List the catalogue's zero-cost models, sorted by display name.
    pub async fn free_models(&self) -> Result<Vec<FreeModel>> {
        let response = self
            .http
            .get(self.endpoint("models"))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(InvokerError::Http {
                status: status.as_u16(),
                body: excerpt(&body),
            });
        }

        let catalogue: ModelsResponse = serde_json::from_str(&body)
            .map_err(|e| InvokerError::InvalidResponse(format!("failed to parse models: {e}")))?;
        let mut free: Vec<FreeModel> = catalogue
            .data
            .into_iter()
            .filter(|entry| entry.pricing.as_ref().is_some_and(|p| p.is_free()))
            .map(|entry| FreeModel {
                name: entry.name.unwrap_or_else(|| entry.id.clone()),
                id: entry.id,
                context_length: entry.context_length,
            })
            .collect();
        free.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(free)
    }
}

#[async_trait]
impl ModelInvoker for OpenRouterInvoker {
    async fn invoke(&self, model: &Model, prompt: &Prompt, timeout: Duration) -> ModelOutcome {
        let request = ChatRequest::from_prompt(model, prompt);
        debug!(
            model = %model,
            messages = request.messages.len(),
            "sending chat completion request"
        );

        let response = match self
            .http
            .post(self.endpoint("chat/completions"))
            .bearer_auth(&self.api_key)
            .timeout(timeout)
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return transport_failure(model, &e, timeout),
        };

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return transport_failure(model, &e, timeout),
        };

        let outcome = classify_response(status, &body);
        if let ModelOutcome::Failure { kind, message } = &outcome {
            warn!(model = %model, kind = %kind, "{}", message);
        }
        outcome
    }
}

fn transport_failure(model: &Model, err: &reqwest::Error, timeout: Duration) -> ModelOutcome {
    if err.is_timeout() {
        warn!(model = %model, "request timed out after {}s", timeout.as_secs());
        ModelOutcome::failure(
            FailureKind::Timeout,
            format!("Timeout ({}s)", timeout.as_secs()),
        )
    } else {
        warn!(model = %model, "request failed: {}", err);
        ModelOutcome::failure(FailureKind::Unknown, err.to_string())
    }
}

/// Classify a completed HTTP exchange.
pub fn classify_response(status: u16, body: &str) -> ModelOutcome {
    if !(200..300).contains(&status) {
        let detail = serde_json::from_str::<ErrorEnvelope>(body)
            .ok()
            .and_then(|envelope| envelope.error)
            .and_then(|error| error.message)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| excerpt(body));
        let kind = if status == 429 {
            FailureKind::RateLimit
        } else {
            FailureKind::HttpError
        };
        return ModelOutcome::failure(kind, format!("HTTP {status}: {detail}"));
    }

    let parsed: ChatResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(e) => {
            return ModelOutcome::failure(
                FailureKind::Unknown,
                format!("failed to parse response: {e}"),
            );
        }
    };

    if let Some(error) = parsed.error {
        let kind = if error.is_rate_limit() {
            FailureKind::RateLimit
        } else {
            FailureKind::ApiError
        };
        return ModelOutcome::failure(kind, error.describe());
    }

    match parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
    {
        Some(text) => ModelOutcome::success(text),
        None => ModelOutcome::failure(FailureKind::EmptyResponse, "Empty response (no choices)"),
    }
}

fn excerpt(body: &str) -> String {
    body.trim().chars().take(BODY_EXCERPT_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_takes_first_choice() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"Paris"}},{"message":{"content":"Lyon"}}]}"#;
        assert_eq!(classify_response(200, body), ModelOutcome::success("Paris"));
    }

    #[test]
    fn test_status_429_is_rate_limit() {
        let body = r#"{"error":{"message":"Rate limit exceeded: free-models-per-min","code":429}}"#;
        assert_eq!(
            classify_response(429, body),
            ModelOutcome::failure(
                FailureKind::RateLimit,
                "HTTP 429: Rate limit exceeded: free-models-per-min"
            )
        );
    }

    #[test]
    fn test_other_status_is_http_error_with_excerpt() {
        let body = "x".repeat(500);
        let outcome = classify_response(502, &body);
        assert_eq!(outcome.failure_kind(), Some(FailureKind::HttpError));
        let ModelOutcome::Failure { message, .. } = outcome else {
            panic!("expected failure");
        };
        assert_eq!(message.len(), "HTTP 502: ".len() + BODY_EXCERPT_CHARS);
    }

    #[test]
    fn test_error_in_ok_body() {
        let limited = r#"{"error":{"message":"Provider returned error","code":429}}"#;
        assert_eq!(
            classify_response(200, limited).failure_kind(),
            Some(FailureKind::RateLimit)
        );

        let api = r#"{"error":{"message":"Provider returned error","code":400}}"#;
        assert_eq!(
            classify_response(200, api),
            ModelOutcome::failure(FailureKind::ApiError, "Provider returned error")
        );
    }

    #[test]
    fn test_missing_or_blank_content_is_empty_response() {
        for body in [
            r#"{"choices":[]}"#,
            r#"{}"#,
            r#"{"choices":[{"message":{"content":null}}]}"#,
            r#"{"choices":[{"message":{"content":"   "}}]}"#,
        ] {
            assert_eq!(
                classify_response(200, body).failure_kind(),
                Some(FailureKind::EmptyResponse),
                "body: {body}"
            );
        }
    }

    #[test]
    fn test_unparseable_body_is_unknown() {
        assert_eq!(
            classify_response(200, "<html>gateway</html>").failure_kind(),
            Some(FailureKind::Unknown)
        );
    }

    #[tokio::test]
    async fn test_connection_refused_is_unknown() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        let err = http
            .get(format!("http://127.0.0.1:{port}/chat/completions"))
            .send()
            .await
            .unwrap_err();

        let model = Model::new("m/1").unwrap();
        let outcome = transport_failure(&model, &err, Duration::from_secs(5));
        assert_eq!(outcome.failure_kind(), Some(FailureKind::Unknown));
    }

    #[test]
    fn test_from_env_requires_key() {
        let err = OpenRouterInvoker::from_env(DEFAULT_API_URL, "LLM_COUNCIL_TEST_UNSET_KEY_VAR")
            .err()
            .unwrap();
        assert!(matches!(err, InvokerError::MissingApiKey(ref var) if var == "LLM_COUNCIL_TEST_UNSET_KEY_VAR"));
    }
}
