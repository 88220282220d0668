//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application types
//! ([`CouncilPolicy`], [`Lineup`]) after validation.

mod council;
mod logging;
mod openrouter;
mod output;
mod policy;

pub use council::FileCouncilConfig;
pub use logging::FileLoggingConfig;
pub use openrouter::FileOpenRouterConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use policy::FilePolicyConfig;

use council_application::CouncilPolicy;
use council_domain::{DomainError, Lineup, Model};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    #[error("{0} cannot be 0")]
    InvalidTimeout(&'static str),

    #[error("{0}: model name cannot be empty")]
    EmptyModelName(&'static str),

    #[error("council: {0}")]
    InvalidCouncil(DomainError),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Competitors and chairman
    pub council: FileCouncilConfig,
    /// Provider endpoint
    pub openrouter: FileOpenRouterConfig,
    /// Call budgets and answer language
    pub policy: FilePolicyConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Transcript settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.policy.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout("policy.timeout_seconds"));
        }
        if self.policy.title_timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout(
                "policy.title_timeout_seconds",
            ));
        }
        if self.openrouter.title_model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName("openrouter.title_model"));
        }

        match self.council.lineup() {
            Ok(_) => Ok(()),
            Err(DomainError::EmptyModelName) => {
                Err(ConfigValidationError::EmptyModelName("council"))
            }
            Err(e) => Err(ConfigValidationError::InvalidCouncil(e)),
        }
    }

    /// Competitors and chairman of the configured council.
    pub fn lineup(&self) -> Result<Lineup, ConfigValidationError> {
        self.council.lineup().map_err(|e| match e {
            DomainError::EmptyModelName => ConfigValidationError::EmptyModelName("council"),
            other => ConfigValidationError::InvalidCouncil(other),
        })
    }

    /// Application policy derived from the `[policy]` and `[openrouter]`
    /// sections.
    pub fn council_policy(&self) -> Result<CouncilPolicy, ConfigValidationError> {
        let title_model = Model::new(self.openrouter.title_model.as_str())
            .map_err(|_| ConfigValidationError::EmptyModelName("openrouter.title_model"))?;
        Ok(CouncilPolicy::default()
            .with_call_timeout(Duration::from_secs(self.policy.timeout_seconds))
            .with_title_timeout(Duration::from_secs(self.policy.title_timeout_seconds))
            .with_title_model(title_model)
            .with_response_language(self.policy.response_language.clone()))
    }
}
