//! Model value object identifying a text-generation service

use crate::core::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier of a model reachable through the invoker (Value Object)
///
/// The identifier is opaque to the council: it is only compared, hashed and
/// handed back to the invoker. Competitor sets must not contain the same
/// identifier twice, while the chairman may coincide with a competitor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Model(String);

impl Model {
    /// Create a model identifier, rejecting blank input.
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyModelName);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the string identifier for this model
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Default competitors for Stage 1 and Stage 2
    pub fn default_council() -> Vec<Model> {
        [
            "deepseek/deepseek-r1-0528:free",
            "meta-llama/llama-3.3-70b-instruct:free",
            "google/gemma-3-27b-it:free",
            "qwen/qwen3-235b-a22b-thinking-2507",
        ]
        .into_iter()
        .map(Model::from_static)
        .collect()
    }

    /// Default chairman for Stage 3
    pub fn default_chairman() -> Model {
        Model::from_static("deepseek/deepseek-r1-0528:free")
    }

    /// Build a model from a compile-time constant known to be non-blank.
    pub fn from_static(id: &'static str) -> Model {
        Model(id.to_string())
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Model {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Model::new(s)
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Model::new(s).map_err(serde::de::Error::custom)
    }
}

/// Parse a list of raw identifiers into models, failing on the first blank entry.
pub fn parse_models<S: AsRef<str>>(raw: &[S]) -> Result<Vec<Model>, DomainError> {
    raw.iter().map(|s| s.as_ref().parse()).collect()
}
