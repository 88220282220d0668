//! Progress events and their ordering contract.
//!
//! A run reports its advancement as a single ordered stream. The accepted
//! type sequence is
//!
//! ```text
//! stage1_start (stage1_retry)* stage1_complete
//! stage2_start stage2_complete
//! stage3_start (stage3_retry)* stage3_complete
//! title_complete complete
//! ```
//!
//! where `error` may replace the remainder at any point after
//! `stage1_start`. [`EventOrder`] is the state machine enforcing it.

use crate::core::model::Model;
use crate::council::chairman::{ChairmanAttempt, ChairmanResult};
use crate::council::evaluation::Evaluation;
use crate::council::response_set::ResponseSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Payload of `stage1_retry`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage1Retry {
    /// Successes counted before this round.
    pub successful: usize,
    /// Models invoked in this round.
    pub retrying: Vec<Model>,
    /// Whether the models are backups rather than a retry of competitors.
    pub backup: bool,
}

/// Stage a terminal error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageId {
    Stage1,
    Stage2,
    Stage3,
}

impl std::fmt::Display for StageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StageId::Stage1 => "stage1",
            StageId::Stage2 => "stage2",
            StageId::Stage3 => "stage3",
        };
        f.write_str(name)
    }
}

/// Structured diagnosis attached to a terminal error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureDetail {
    QuorumShortfall {
        successful: usize,
        required: usize,
        retried: Vec<Model>,
        backups_tried: Vec<Model>,
    },
    ChairmanExhausted {
        attempts: Vec<ChairmanAttempt>,
    },
}

/// Payload of `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineError {
    pub stage: StageId,
    pub reason: String,
    pub detail: FailureDetail,
}

/// One progress event. Serialized as `{"type": ..., "data": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ProgressEvent {
    Stage1Start {},
    Stage1Retry(Stage1Retry),
    Stage1Complete { responses: ResponseSet },
    Stage2Start {},
    Stage2Complete(Evaluation),
    Stage3Start {},
    Stage3Retry { attempts: Vec<ChairmanAttempt> },
    Stage3Complete(ChairmanResult),
    TitleComplete { title: Option<String> },
    Complete {},
    Error(PipelineError),
}

/// Event type without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Stage1Start,
    Stage1Retry,
    Stage1Complete,
    Stage2Start,
    Stage2Complete,
    Stage3Start,
    Stage3Retry,
    Stage3Complete,
    TitleComplete,
    Complete,
    Error,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Stage1Start => "stage1_start",
            EventKind::Stage1Retry => "stage1_retry",
            EventKind::Stage1Complete => "stage1_complete",
            EventKind::Stage2Start => "stage2_start",
            EventKind::Stage2Complete => "stage2_complete",
            EventKind::Stage3Start => "stage3_start",
            EventKind::Stage3Retry => "stage3_retry",
            EventKind::Stage3Complete => "stage3_complete",
            EventKind::TitleComplete => "title_complete",
            EventKind::Complete => "complete",
            EventKind::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, EventKind::Complete | EventKind::Error)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ProgressEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ProgressEvent::Stage1Start {} => EventKind::Stage1Start,
            ProgressEvent::Stage1Retry(_) => EventKind::Stage1Retry,
            ProgressEvent::Stage1Complete { .. } => EventKind::Stage1Complete,
            ProgressEvent::Stage2Start {} => EventKind::Stage2Start,
            ProgressEvent::Stage2Complete(_) => EventKind::Stage2Complete,
            ProgressEvent::Stage3Start {} => EventKind::Stage3Start,
            ProgressEvent::Stage3Retry { .. } => EventKind::Stage3Retry,
            ProgressEvent::Stage3Complete(_) => EventKind::Stage3Complete,
            ProgressEvent::TitleComplete { .. } => EventKind::TitleComplete,
            ProgressEvent::Complete {} => EventKind::Complete,
            ProgressEvent::Error(_) => EventKind::Error,
        }
    }
}

/// An event together with its position in the run's stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SequencedEvent {
    /// 0-based, gap-free within a run.
    pub sequence: u64,
    #[serde(flatten)]
    pub event: ProgressEvent,
}

/// An event type that may not follow the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{next} cannot follow {}", .previous.map(|k| k.as_str()).unwrap_or("start of stream"))]
pub struct OrderViolation {
    pub previous: Option<EventKind>,
    pub next: EventKind,
}

/// State machine over the accepted event sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventOrder {
    last: Option<EventKind>,
}

impl EventOrder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<EventKind> {
        self.last
    }

    /// Whether the stream has ended with `complete` or `error`.
    pub fn is_finished(&self) -> bool {
        self.last.is_some_and(|k| k.is_terminal())
    }

    pub fn accepts(&self, next: EventKind) -> bool {
        use EventKind::*;
        match (self.last, next) {
            (None, Stage1Start) => true,
            (None, _) => false,
            (Some(last), _) if last.is_terminal() => false,
            (Some(_), Error) => true,
            (Some(Stage1Start | Stage1Retry), Stage1Retry | Stage1Complete) => true,
            (Some(Stage1Complete), Stage2Start) => true,
            (Some(Stage2Start), Stage2Complete) => true,
            (Some(Stage2Complete), Stage3Start) => true,
            (Some(Stage3Start | Stage3Retry), Stage3Retry | Stage3Complete) => true,
            (Some(Stage3Complete), TitleComplete) => true,
            (Some(TitleComplete), Complete) => true,
            _ => false,
        }
    }

    /// Move to `next`, or report why it is out of order.
    pub fn advance(&mut self, next: EventKind) -> Result<(), OrderViolation> {
        if !self.accepts(next) {
            return Err(OrderViolation {
                previous: self.last,
                next,
            });
        }
        self.last = Some(next);
        Ok(())
    }

    /// Check a recorded trace from the start of the stream.
    pub fn validate(trace: impl IntoIterator<Item = EventKind>) -> Result<(), OrderViolation> {
        let mut order = EventOrder::new();
        for kind in trace {
            order.advance(kind)?;
        }
        Ok(())
    }
}
