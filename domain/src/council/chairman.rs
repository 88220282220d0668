//! Stage 3 attempt history and verdict.

use crate::core::model::Model;
use crate::council::outcome::{FailureKind, ModelOutcome};
use serde::{Deserialize, Serialize};

/// Outcome of one chairman attempt, without the verdict text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttemptOutcome {
    Success,
    Failure { kind: FailureKind, message: String },
}

impl AttemptOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AttemptOutcome::Success)
    }
}

impl From<&ModelOutcome> for AttemptOutcome {
    fn from(outcome: &ModelOutcome) -> Self {
        match outcome {
            ModelOutcome::Success { .. } => AttemptOutcome::Success,
            ModelOutcome::Failure { kind, message } => AttemptOutcome::Failure {
                kind: *kind,
                message: message.clone(),
            },
        }
    }
}

/// One synthesis attempt by the chairman or a backup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChairmanAttempt {
    pub model: Model,
    pub outcome: AttemptOutcome,
    /// 0-based position in the attempt history.
    pub attempt_index: usize,
}

/// Final verdict. Only exists when some attempt succeeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChairmanResult {
    /// The model that actually produced the verdict (may be a backup).
    pub model: Model,
    pub verdict_text: String,
    /// Every attempt made, including the successful one.
    pub attempts: Vec<ChairmanAttempt>,
}

impl ChairmanResult {
    /// Whether a backup had to stand in for the designated chairman.
    pub fn used_backup(&self, chairman: &Model) -> bool {
        &self.model != chairman
    }
}
