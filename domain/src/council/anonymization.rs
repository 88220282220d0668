//! Anonymized labels for cross-evaluation.
//!
//! Stage 2 shows each evaluator the Stage 1 answers under opaque labels
//! (`Response A`, `Response B`, …) so no model knows which answer is its
//! own. The [`AnonymizationMap`] is the two-way table used to hide model
//! identities and restore them afterwards.

use crate::core::model::Model;
use crate::council::response_set::ResponseSet;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;

/// Opaque anonymized label such as `A` or `AB`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    /// Label for the `index`-th (0-based) anonymized response.
    ///
    /// Produces `A..Z`, then `AA, AB, …` (bijective base 26).
    pub fn for_index(index: usize) -> Label {
        let mut n = index + 1;
        let mut letters = Vec::new();
        while n > 0 {
            let rem = (n - 1) % 26;
            letters.push((b'A' + rem as u8) as char);
            n = (n - 1) / 26;
        }
        Label(letters.into_iter().rev().collect())
    }

    /// Parse a raw token into a label. Only uppercase ASCII letters qualify.
    pub fn parse(raw: &str) -> Option<Label> {
        if !raw.is_empty() && raw.chars().all(|c| c.is_ascii_uppercase()) {
            Some(Label(raw.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// How the label is shown to evaluators, e.g. `Response A`.
    pub fn display_name(&self) -> String {
        format!("Response {}", self.0)
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bijection between labels and the models that succeeded in Stage 1.
///
/// Built once from the successful subset of a [`ResponseSet`], in its
/// order, and never mutated afterwards. Label order therefore equals
/// Stage 1 dispatch order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnonymizationMap {
    labels: Vec<Label>,
    to_model: HashMap<Label, Model>,
    to_label: HashMap<Model, Label>,
}

impl AnonymizationMap {
    pub fn from_responses(responses: &ResponseSet) -> Self {
        Self::from_models(responses.successes().map(|(model, _)| model.clone()))
    }

    /// Assign labels to models in iteration order. A repeated model keeps
    /// its first label so the mapping stays one-to-one.
    pub fn from_models(models: impl IntoIterator<Item = Model>) -> Self {
        let mut map = Self::default();
        for model in models {
            if map.to_label.contains_key(&model) {
                continue;
            }
            let label = Label::for_index(map.labels.len());
            map.labels.push(label.clone());
            map.to_model.insert(label.clone(), model.clone());
            map.to_label.insert(model, label);
        }
        map
    }

    pub fn model_for(&self, label: &Label) -> Option<&Model> {
        self.to_model.get(label)
    }

    pub fn label_for(&self, model: &Model) -> Option<&Label> {
        self.to_label.get(model)
    }

    pub fn contains_label(&self, label: &Label) -> bool {
        self.to_model.contains_key(label)
    }

    /// Position of a label in assignment (dispatch) order.
    pub fn position(&self, label: &Label) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// `(label, model)` pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&Label, &Model)> {
        self.labels.iter().map(|label| (label, &self.to_model[label]))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Serialized as the `label_to_model` object, keys in label order.
impl Serialize for AnonymizationMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.labels.len()))?;
        for (label, model) in self.iter() {
            map.serialize_entry(label, model)?;
        }
        map.end()
    }
}
