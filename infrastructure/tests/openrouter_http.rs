//! Mock HTTP server tests for `OpenRouterInvoker`.
//!
//! Uses [`wiremock`] to stand up a local server emulating the OpenAI chat
//! completion API, exercising the full request/response path and the
//! failure classification without hitting a real provider.

use std::time::Duration;

use council_application::ModelInvoker;
use council_domain::{FailureKind, Model, ModelOutcome, Prompt};
use council_infrastructure::{InvokerError, OpenRouterInvoker};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn model() -> Model {
    Model::new("deepseek/deepseek-r1-0528:free").unwrap()
}

fn prompt() -> Prompt {
    Prompt::new("You are a judge.", "Which is better?")
}

async fn invoke(server: &MockServer, timeout: Duration) -> ModelOutcome {
    let invoker = OpenRouterInvoker::new(server.uri(), "sk-mock-key").unwrap();
    invoker.invoke(&model(), &prompt(), timeout).await
}

// ── Successful completion ──────────────────────────────────────────────

#[tokio::test]
async fn invoke_success_sends_bearer_and_messages() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer sk-mock-key"))
        .and(body_partial_json(serde_json::json!({
            "model": "deepseek/deepseek-r1-0528:free",
            "messages": [
                {"role": "system", "content": "You are a judge."},
                {"role": "user", "content": "Which is better?"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "gen-1",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Response B is better."},
                "finish_reason": "stop"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = invoke(&server, Duration::from_secs(5)).await;
    assert_eq!(outcome, ModelOutcome::success("Response B is better."));
}

// ── Failure classification ─────────────────────────────────────────────

#[tokio::test]
async fn invoke_http_429_is_rate_limit() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
            "error": {"message": "Rate limit exceeded", "code": 429}
        })))
        .mount(&server)
        .await;

    let outcome = invoke(&server, Duration::from_secs(5)).await;
    assert_eq!(
        outcome,
        ModelOutcome::failure(FailureKind::RateLimit, "HTTP 429: Rate limit exceeded")
    );
}

#[tokio::test]
async fn invoke_http_500_is_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let outcome = invoke(&server, Duration::from_secs(5)).await;
    assert_eq!(
        outcome,
        ModelOutcome::failure(FailureKind::HttpError, "HTTP 500: upstream exploded")
    );
}

#[tokio::test]
async fn invoke_error_body_with_200_is_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "error": {"message": "Provider returned error", "code": 502}
        })))
        .mount(&server)
        .await;

    let outcome = invoke(&server, Duration::from_secs(5)).await;
    assert_eq!(
        outcome,
        ModelOutcome::failure(FailureKind::ApiError, "Provider returned error")
    );
}

#[tokio::test]
async fn invoke_empty_choices_is_empty_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
        )
        .mount(&server)
        .await;

    let outcome = invoke(&server, Duration::from_secs(5)).await;
    assert_eq!(outcome.failure_kind(), Some(FailureKind::EmptyResponse));
}

#[tokio::test]
async fn invoke_slow_server_is_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(5))
                .set_body_json(serde_json::json!({"choices": []})),
        )
        .mount(&server)
        .await;

    let outcome = invoke(&server, Duration::from_millis(200)).await;
    assert_eq!(outcome.failure_kind(), Some(FailureKind::Timeout));
}

#[tokio::test]
async fn invoke_unreachable_server_fails_without_panicking() {
    let invoker = OpenRouterInvoker::new(closed_port_url(), "sk-mock-key").unwrap();
    let outcome = invoker
        .invoke(&model(), &prompt(), Duration::from_secs(5))
        .await;
    // A proxy in the environment may answer for the closed port, so only the
    // absence of text is certain here.
    assert!(outcome.failure_kind().is_some());
}

/// Loopback URL whose port was just released
fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

// ── Free model catalogue ───────────────────────────────────────────────

#[tokio::test]
async fn free_models_filters_and_sorts() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [
                {
                    "id": "paid/model",
                    "name": "Paid Model",
                    "pricing": {"prompt": "0.000002", "completion": "0.000004"}
                },
                {
                    "id": "z/free",
                    "name": "Zeta (free)",
                    "context_length": 8192,
                    "pricing": {"prompt": "0", "completion": "0"}
                },
                {
                    "id": "a/free",
                    "name": "Alpha (free)",
                    "pricing": {"prompt": "0", "completion": "0"}
                }
            ]
        })))
        .mount(&server)
        .await;

    let invoker = OpenRouterInvoker::new(server.uri(), "sk-mock-key").unwrap();
    let free = invoker.free_models().await.unwrap();
    let ids: Vec<&str> = free.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["a/free", "z/free"]);
    assert_eq!(free[1].context_length, Some(8192));
}

#[tokio::test]
async fn free_models_surfaces_http_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&server)
        .await;

    let invoker = OpenRouterInvoker::new(server.uri(), "sk-mock-key").unwrap();
    let err = invoker.free_models().await.unwrap_err();
    assert!(matches!(err, InvokerError::Http { status: 401, .. }));
}
