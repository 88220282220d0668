//! Ranking extraction from free-form evaluator output.
//!
//! Evaluators are asked to end with a `FINAL RANKING:` block listing
//! `Response X` labels best-to-worst, but free-tier models follow that
//! instruction loosely. [`parse_ranking`] is a best-effort extractor: it
//! never fails, it returns labels in the order they first appear, and it
//! only ever returns labels that exist in the [`AnonymizationMap`].
//!
//! | Source | Pattern | Example |
//! |--------|---------|---------|
//! | numbered entries | `Response` entries, anywhere in a line | `1. Response C 2. Response A` |
//! | numbered entries | bare labels on their own line | `2) B` |
//! | mentions | any `Response` mention | `C is best, then Response A` |
//!
//! Both sources are read from the ranking section (the text after
//! `FINAL RANKING:` when present, otherwise the whole text). Numbered
//! entries of either form are merged by position. The source yielding more
//! known labels wins, numbered entries on a tie.

use crate::core::model::Model;
use crate::council::anonymization::{AnonymizationMap, Label};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

const SECTION_MARKER: &str = "final ranking";

static NUMBERED_RESPONSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+\s*[.):]\s*[*_]*\s*Response\s+([A-Z]{1,2})\b")
        .expect("static regex")
});

static ANY_RESPONSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Response\s+([A-Z]{1,2})\b").expect("static regex"));

static NUMBERED_BARE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[\s>*_#-]*\d+\s*[.):]\s*[*_]*([A-Z]{1,2})[*_]*\s*$").expect("static regex")
});

/// One evaluator's ranking: its raw text and the labels parsed from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    pub model: Model,
    pub raw_text: String,
    /// Best-to-worst; possibly shorter than the label set.
    pub parsed_labels: Vec<Label>,
}

impl Ranking {
    /// Parse `raw_text` against `map` and keep both.
    pub fn parse(model: Model, raw_text: impl Into<String>, map: &AnonymizationMap) -> Self {
        let raw_text = raw_text.into();
        let parsed_labels = parse_ranking(&raw_text, map);
        Self {
            model,
            raw_text,
            parsed_labels,
        }
    }

    /// 1-based position of `label` in this ranking.
    pub fn position_of(&self, label: &Label) -> Option<usize> {
        self.parsed_labels
            .iter()
            .position(|l| l == label)
            .map(|i| i + 1)
    }
}

/// Extract the ordered labels from an evaluator's response.
pub fn parse_ranking(text: &str, map: &AnonymizationMap) -> Vec<Label> {
    let section = ranking_section(text);

    let mut numbered = matches(&NUMBERED_RESPONSE, section);
    numbered.extend(matches(&NUMBERED_BARE, section));
    numbered.sort_by_key(|(start, _)| *start);
    let numbered = known_in_order(numbered, map);

    let mentions = known_in_order(matches(&ANY_RESPONSE, section), map);

    if mentions.len() > numbered.len() {
        mentions
    } else {
        numbered
    }
}

/// Text after the first `FINAL RANKING` marker, or the whole text.
fn ranking_section(text: &str) -> &str {
    let lowered = text.to_ascii_lowercase();
    match lowered.find(SECTION_MARKER) {
        // ASCII lowercasing keeps byte offsets aligned with `text`.
        Some(start) => {
            let rest = &text[start + SECTION_MARKER.len()..];
            rest.strip_prefix(':').unwrap_or(rest)
        }
        None => text,
    }
}

/// Label tokens captured by `pattern`, with their byte offsets.
fn matches<'t>(pattern: &Regex, section: &'t str) -> Vec<(usize, &'t str)> {
    pattern
        .captures_iter(section)
        .filter_map(|caps| caps.get(1))
        .map(|m| (m.start(), m.as_str()))
        .collect()
}

fn known_in_order(tokens: Vec<(usize, &str)>, map: &AnonymizationMap) -> Vec<Label> {
    let mut seen = HashSet::new();
    tokens
        .into_iter()
        .filter_map(|(_, token)| Label::parse(token))
        .filter(|label| map.contains_label(label))
        .filter(|label| seen.insert(label.clone()))
        .collect()
}
