//! Council composition for a single run.

use crate::core::error::{DomainError, MAX_COMPETITORS, MIN_COMPETITORS};
use crate::core::model::Model;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Competitors and chairman of one run (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lineup {
    competitors: Vec<Model>,
    chairman: Model,
}

impl Default for Lineup {
    fn default() -> Self {
        Self {
            competitors: Model::default_council(),
            chairman: Model::default_chairman(),
        }
    }
}

impl Lineup {
    /// Validate and build a lineup.
    ///
    /// Requires 2–6 distinct competitors. The chairman may also compete.
    pub fn new(competitors: Vec<Model>, chairman: Model) -> Result<Self, DomainError> {
        if !(MIN_COMPETITORS..=MAX_COMPETITORS).contains(&competitors.len()) {
            return Err(DomainError::InvalidCouncilSize(competitors.len()));
        }
        let mut seen = HashSet::new();
        for model in &competitors {
            if !seen.insert(model) {
                return Err(DomainError::DuplicateModel(model.to_string()));
            }
        }
        Ok(Self {
            competitors,
            chairman,
        })
    }

    pub fn competitors(&self) -> &[Model] {
        &self.competitors
    }

    pub fn chairman(&self) -> &Model {
        &self.chairman
    }
}
