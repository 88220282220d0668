//! Council composition from TOML (`[council]` section)
//!
//! ```toml
//! [council]
//! models = ["deepseek/deepseek-r1-0528:free", "google/gemma-3-27b-it:free"]
//! chairman = "deepseek/deepseek-r1-0528:free"
//! ```

use council_domain::{DomainError, Lineup, Model, parse_models};
use serde::{Deserialize, Serialize};

/// Raw council configuration from TOML
///
/// Unset fields fall back to the built-in council.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCouncilConfig {
    /// Competitor model ids
    pub models: Option<Vec<String>>,
    /// Chairman model id
    pub chairman: Option<String>,
}

impl FileCouncilConfig {
    /// Competitors, or the default council when unset.
    pub fn competitors(&self) -> Result<Vec<Model>, DomainError> {
        match &self.models {
            Some(models) => parse_models(models.as_slice()),
            None => Ok(Model::default_council()),
        }
    }

    /// Chairman, or the default chairman when unset.
    pub fn chairman(&self) -> Result<Model, DomainError> {
        match &self.chairman {
            Some(chairman) => Model::new(chairman.as_str()),
            None => Ok(Model::default_chairman()),
        }
    }

    pub fn lineup(&self) -> Result<Lineup, DomainError> {
        Lineup::new(self.competitors()?, self.chairman()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_uses_default_council() {
        let lineup = FileCouncilConfig::default().lineup().unwrap();
        assert_eq!(lineup, Lineup::default());
    }

    #[test]
    fn test_configured_lineup() {
        let config = FileCouncilConfig {
            models: Some(vec!["a/one".into(), "b/two".into()]),
            chairman: Some("c/three".into()),
        };
        let lineup = config.lineup().unwrap();
        assert_eq!(lineup.competitors().len(), 2);
        assert_eq!(lineup.chairman().as_str(), "c/three");
    }

    #[test]
    fn test_blank_chairman_rejected() {
        let config = FileCouncilConfig {
            models: None,
            chairman: Some("  ".into()),
        };
        assert_eq!(config.chairman(), Err(DomainError::EmptyModelName));
    }
}
