//! Council domain
//!
//! Everything the three-stage council needs that involves no I/O.
//!
//! ```text
//! question ──► Stage 1: competitors answer ──► ResponseSet
//!                 (retry, then backups, until 2 answers)
//!          ──► Stage 2: anonymize, cross-rank ──► Evaluation
//!                 (AnonymizationMap, Ranking, aggregate)
//!          ──► Stage 3: chairman synthesizes ──► ChairmanResult
//!                 (self-retry, then up to 7 backups one at a time)
//! ```
//!
//! Progress is reported through [`ProgressEvent`]s whose order is guarded
//! by [`EventOrder`].

pub mod aggregate;
pub mod anonymization;
pub mod chairman;
pub mod evaluation;
pub mod event;
pub mod lineup;
pub mod outcome;
pub mod policy;
pub mod ranking;
pub mod response_set;

pub use aggregate::{AggregateEntry, aggregate_rankings};
pub use anonymization::{AnonymizationMap, Label};
pub use chairman::{AttemptOutcome, ChairmanAttempt, ChairmanResult};
pub use evaluation::Evaluation;
pub use event::{
    EventKind, EventOrder, FailureDetail, OrderViolation, PipelineError, ProgressEvent,
    SequencedEvent, Stage1Retry, StageId,
};
pub use lineup::Lineup;
pub use outcome::{FailureKind, ModelOutcome};
pub use policy::{BackupBatching, FallbackPhase, FallbackPolicy, FallbackStep};
pub use ranking::{Ranking, parse_ranking};
pub use response_set::{ResponseEntry, ResponseSet};
