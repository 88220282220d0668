//! Stage 1 response collection.

use crate::core::model::Model;
use crate::council::outcome::ModelOutcome;
use serde::{Deserialize, Serialize};

/// Latest outcome of one model dispatched in Stage 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEntry {
    pub model: Model,
    #[serde(flatten)]
    pub outcome: ModelOutcome,
    /// Number of invocations made for this model (2 after a retry).
    pub attempts: u32,
}

impl ResponseEntry {
    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}

/// Ordered Stage 1 outcomes, one entry per dispatched model.
///
/// Entry order is dispatch order: competitors in the order they were
/// configured, then backups in the order they were tried. Recording a new
/// outcome for an already-present model replaces its outcome in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseSet {
    entries: Vec<ResponseEntry>,
}

impl ResponseSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one invocation.
    pub fn record(&mut self, model: Model, outcome: ModelOutcome) {
        match self.entries.iter_mut().find(|e| e.model == model) {
            Some(entry) => {
                entry.outcome = outcome;
                entry.attempts += 1;
            }
            None => self.entries.push(ResponseEntry {
                model,
                outcome,
                attempts: 1,
            }),
        }
    }

    pub fn entries(&self) -> &[ResponseEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, model: &Model) -> bool {
        self.entries.iter().any(|e| &e.model == model)
    }

    /// Successful entries as `(model, text)` in dispatch order.
    pub fn successes(&self) -> impl Iterator<Item = (&Model, &str)> {
        self.entries
            .iter()
            .filter_map(|e| e.outcome.text().map(|text| (&e.model, text)))
    }

    pub fn success_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_success()).count()
    }

    /// Models whose latest outcome is a failure, in dispatch order.
    pub fn failed_models(&self) -> Vec<Model> {
        self.entries
            .iter()
            .filter(|e| !e.is_success())
            .map(|e| e.model.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::council::outcome::FailureKind;

    fn m(id: &str) -> Model {
        Model::new(id).unwrap()
    }

    #[test]
    fn test_record_preserves_dispatch_order() {
        let mut set = ResponseSet::new();
        set.record(m("m1"), ModelOutcome::success("a"));
        set.record(m("m2"), ModelOutcome::failure(FailureKind::Timeout, "t"));
        set.record(m("m3"), ModelOutcome::success("c"));

        let order: Vec<_> = set.entries().iter().map(|e| e.model.as_str()).collect();
        assert_eq!(order, vec!["m1", "m2", "m3"]);
        assert_eq!(set.success_count(), 2);
        assert_eq!(set.failed_models(), vec![m("m2")]);
    }

    #[test]
    fn test_retry_replaces_in_place() {
        let mut set = ResponseSet::new();
        set.record(m("m1"), ModelOutcome::failure(FailureKind::RateLimit, "429"));
        set.record(m("m2"), ModelOutcome::success("b"));
        set.record(m("m1"), ModelOutcome::success("a"));

        assert_eq!(set.len(), 2);
        assert_eq!(set.entries()[0].model, m("m1"));
        assert_eq!(set.entries()[0].attempts, 2);
        assert!(set.entries()[0].is_success());
        let successes: Vec<_> = set.successes().map(|(model, _)| model.as_str()).collect();
        assert_eq!(successes, vec!["m1", "m2"]);
    }

    #[test]
    fn test_entry_serialization_is_flat() {
        let mut set = ResponseSet::new();
        set.record(m("m1"), ModelOutcome::success("hello"));
        set.record(m("m2"), ModelOutcome::failure(FailureKind::EmptyResponse, "no choices"));
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                { "model": "m1", "text": "hello", "attempts": 1 },
                { "model": "m2", "error_kind": "empty_response", "error": "no choices", "attempts": 1 }
            ])
        );
    }
}
