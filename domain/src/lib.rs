//! Domain layer for llm-council
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Council
//!
//! A question goes to several independent models ("competitors"). Their
//! answers are anonymized and cross-ranked by the same models, and a
//! designated chairman synthesizes the final verdict.
//!
//! ## Fallback
//!
//! Free-tier endpoints fail often. Stage 1 and Stage 3 share one
//! [`FallbackPolicy`]: retry the failed targets once, then bring in backups
//! until the stage's quorum is met or the backups run out.

pub mod config;
pub mod core;
pub mod council;
pub mod prompt;

// Re-export commonly used types
pub use config::OutputFormat;
pub use crate::core::{
    error::{DomainError, MAX_COMPETITORS, MIN_COMPETITORS},
    model::{Model, parse_models},
    question::Question,
};
pub use council::{
    AggregateEntry, AnonymizationMap, AttemptOutcome, BackupBatching, ChairmanAttempt,
    ChairmanResult, Evaluation, EventKind, EventOrder, FailureDetail, FailureKind, FallbackPhase,
    FallbackPolicy, FallbackStep, Label, Lineup, ModelOutcome, OrderViolation, PipelineError,
    ProgressEvent, Ranking, ResponseEntry, ResponseSet, SequencedEvent, Stage1Retry, StageId,
    aggregate_rankings, parse_ranking,
};
pub use prompt::{Prompt, PromptTemplate};
