//! Cross-evaluator consensus ranking.

use crate::core::model::Model;
use crate::council::anonymization::AnonymizationMap;
use crate::council::ranking::Ranking;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Consensus position of one model across all rankings that mention it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateEntry {
    pub model: Model,
    /// Mean of the 1-based positions in the rankings that mention the model.
    pub average_rank: f64,
    /// Number of rankings that mention the model.
    pub rankings_count: usize,
}

/// Compute the aggregate ranking.
///
/// A model absent from an evaluator's parsed ranking gets no position from
/// that evaluator; a model no evaluator mentions does not appear at all.
/// Entries are ordered by ascending mean position, then by higher mention
/// count, then by Stage 1 dispatch order (label order).
pub fn aggregate_rankings(rankings: &[Ranking], map: &AnonymizationMap) -> Vec<AggregateEntry> {
    // (sum of positions, mentions) per label, indexed by label position
    let mut totals = vec![(0usize, 0usize); map.len()];

    for ranking in rankings {
        for (index, label) in ranking.parsed_labels.iter().enumerate() {
            if let Some(slot) = map.position(label) {
                totals[slot].0 += index + 1;
                totals[slot].1 += 1;
            }
        }
    }

    let mut entries: Vec<(usize, AggregateEntry)> = map
        .iter()
        .zip(totals)
        .enumerate()
        .filter(|(_, (_, (_, count)))| *count > 0)
        .map(|(order, ((_, model), (sum, count)))| {
            (
                order,
                AggregateEntry {
                    model: model.clone(),
                    average_rank: sum as f64 / count as f64,
                    rankings_count: count,
                },
            )
        })
        .collect();

    entries.sort_by(|(order_a, a), (order_b, b)| {
        a.average_rank
            .partial_cmp(&b.average_rank)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.rankings_count.cmp(&a.rankings_count))
            .then_with(|| order_a.cmp(order_b))
    });

    entries.into_iter().map(|(_, entry)| entry).collect()
}
