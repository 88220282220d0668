//! Stage 2 result bundle.

use crate::council::aggregate::{AggregateEntry, aggregate_rankings};
use crate::council::anonymization::AnonymizationMap;
use crate::council::ranking::Ranking;
use serde::Serialize;

/// Rankings, the label table needed to read them, and their consensus.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Evaluation {
    pub rankings: Vec<Ranking>,
    pub label_to_model: AnonymizationMap,
    pub aggregate: Vec<AggregateEntry>,
}

impl Evaluation {
    /// Bundle the rankings with their aggregate.
    pub fn new(label_to_model: AnonymizationMap, rankings: Vec<Ranking>) -> Self {
        let aggregate = aggregate_rankings(&rankings, &label_to_model);
        Self {
            rankings,
            label_to_model,
            aggregate,
        }
    }
}
