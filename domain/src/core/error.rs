//! Domain error types

use thiserror::Error;

/// Smallest council accepted by a run
pub const MIN_COMPETITORS: usize = 2;
/// Largest council accepted by a run
pub const MAX_COMPETITORS: usize = 6;

/// Domain-level validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Model identifier cannot be empty")]
    EmptyModelName,

    #[error("A council needs between 2 and 6 models, got {0}")]
    InvalidCouncilSize(usize),

    #[error("Model {0} appears more than once in the council")]
    DuplicateModel(String),
}
