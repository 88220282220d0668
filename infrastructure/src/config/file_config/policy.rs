//! Run policy from TOML (`[policy]` section)

use serde::{Deserialize, Serialize};

/// Raw policy configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePolicyConfig {
    /// Budget in seconds for every model call
    pub timeout_seconds: u64,
    /// Budget in seconds for the title call
    pub title_timeout_seconds: u64,
    /// Language every answer must be written in
    pub response_language: Option<String>,
}

impl Default for FilePolicyConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 120,
            title_timeout_seconds: 30,
            response_language: None,
        }
    }
}
