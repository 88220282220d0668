//! Provider endpoint configuration from TOML (`[openrouter]` section)

use serde::{Deserialize, Serialize};

/// Raw provider configuration from TOML
///
/// # Example
///
/// ```toml
/// [openrouter]
/// api_url = "https://openrouter.ai/api/v1"
/// api_key_env = "OPENROUTER_API_KEY"
/// title_model = "google/gemini-2.5-flash"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOpenRouterConfig {
    /// Base URL of the OpenAI-compatible API
    pub api_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Model used for conversation titles
    pub title_model: String,
}

impl Default for FileOpenRouterConfig {
    fn default() -> Self {
        Self {
            api_url: "https://openrouter.ai/api/v1".to_string(),
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            title_model: "google/gemini-2.5-flash".to_string(),
        }
    }
}
