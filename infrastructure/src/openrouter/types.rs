//! Wire types for the OpenAI-compatible chat completion API.

use council_domain::{Model, Prompt};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A message in a chat request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// A chat completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    pub fn from_prompt(model: &Model, prompt: &Prompt) -> Self {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &prompt.system {
            messages.push(ChatMessage::system(system.clone()));
        }
        messages.push(ChatMessage::user(prompt.user.clone()));
        Self {
            model: model.to_string(),
            messages,
        }
    }
}

/// A chat completion response. OpenRouter may answer 200 with an `error`
/// object instead of choices.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Error object embedded in a response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub message: Option<String>,
    /// Numeric on most providers, sometimes a string.
    #[serde(default)]
    pub code: Option<Value>,
}

impl ApiError {
    pub fn is_rate_limit(&self) -> bool {
        match &self.code {
            Some(Value::Number(n)) => n.as_u64() == Some(429),
            Some(Value::String(s)) => s.trim() == "429",
            _ => false,
        }
    }

    pub fn describe(&self) -> String {
        match (&self.message, &self.code) {
            (Some(message), _) if !message.trim().is_empty() => message.clone(),
            (_, Some(code)) => format!("API error (code {code})"),
            _ => "API error".to_string(),
        }
    }
}

/// Envelope used to dig a message out of a non-2xx body.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: Option<ApiError>,
}

/// `GET /models` response.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelsResponse {
    #[serde(default)]
    pub data: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub context_length: Option<u64>,
    #[serde(default)]
    pub pricing: Option<Pricing>,
}

/// Per-token prices, sent as decimal strings.
#[derive(Debug, Clone, Deserialize)]
pub struct Pricing {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub completion: Option<String>,
}

impl Pricing {
    pub fn is_free(&self) -> bool {
        let zero = |price: &Option<String>| {
            price
                .as_deref()
                .and_then(|p| p.trim().parse::<f64>().ok())
                .is_some_and(|p| p == 0.0)
        };
        zero(&self.prompt) && zero(&self.completion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_from_prompt() {
        let model = Model::new("deepseek/deepseek-r1-0528:free").unwrap();
        let request = ChatRequest::from_prompt(&model, &Prompt::new("be brief", "hi"));
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "deepseek/deepseek-r1-0528:free");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");

        let request = ChatRequest::from_prompt(&model, &Prompt::user_only("hi"));
        assert_eq!(request.messages.len(), 1);
    }

    #[test]
    fn test_api_error_code_forms() {
        let numeric: ApiError = serde_json::from_str(r#"{"message":"slow down","code":429}"#).unwrap();
        assert!(numeric.is_rate_limit());
        let text: ApiError = serde_json::from_str(r#"{"message":"slow down","code":"429"}"#).unwrap();
        assert!(text.is_rate_limit());
        let other: ApiError = serde_json::from_str(r#"{"code":502}"#).unwrap();
        assert!(!other.is_rate_limit());
        assert_eq!(other.describe(), "API error (code 502)");
    }

    #[test]
    fn test_pricing_is_free() {
        let free: Pricing = serde_json::from_str(r#"{"prompt":"0","completion":"0"}"#).unwrap();
        assert!(free.is_free());
        let paid: Pricing =
            serde_json::from_str(r#"{"prompt":"0.000001","completion":"0"}"#).unwrap();
        assert!(!paid.is_free());
        let missing: Pricing = serde_json::from_str(r#"{}"#).unwrap();
        assert!(!missing.is_free());
    }
}
