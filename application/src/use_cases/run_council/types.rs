//! Input, output and error types for the council use case.

use council_domain::{
    ChairmanAttempt, ChairmanResult, DomainError, Evaluation, FailureDetail, Lineup, Model,
    OrderViolation, PipelineError, Question, ResponseSet, StageId,
};
use serde::Serialize;
use thiserror::Error;

use crate::ports::progress::EmitError;

/// Errors that can end a council run
#[derive(Error, Debug)]
pub enum RunCouncilError {
    #[error("Invalid council input: {0}")]
    InvalidInput(#[from] DomainError),

    #[error("Conversation {0} already has a council run in progress")]
    AlreadyRunning(String),

    #[error(
        "Stage 1 collected {successful} of {required} required responses (retried {}, tried {} backups)",
        .retried.len(),
        .backups_tried.len()
    )]
    QuorumNotReached {
        successful: usize,
        required: usize,
        retried: Vec<Model>,
        backups_tried: Vec<Model>,
        responses: ResponseSet,
    },

    #[error("No chairman produced a verdict after {} attempts", .attempts.len())]
    NoVerdict {
        attempts: Vec<ChairmanAttempt>,
        partial: Box<CouncilReport>,
    },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Progress event out of order: {0}")]
    EventOrder(OrderViolation),
}

impl From<EmitError> for RunCouncilError {
    fn from(err: EmitError) -> Self {
        match err {
            EmitError::Disconnected => RunCouncilError::Cancelled,
            EmitError::OutOfOrder(violation) => RunCouncilError::EventOrder(violation),
        }
    }
}

impl RunCouncilError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunCouncilError::Cancelled)
    }

    /// Stage the error terminated, for errors raised by the pipeline itself.
    pub fn stage(&self) -> Option<StageId> {
        match self {
            RunCouncilError::QuorumNotReached { .. } => Some(StageId::Stage1),
            RunCouncilError::NoVerdict { .. } => Some(StageId::Stage3),
            _ => None,
        }
    }

    /// Payload of the `error` progress event reporting this failure.
    pub fn pipeline_error(&self) -> Option<PipelineError> {
        let detail = match self {
            RunCouncilError::QuorumNotReached {
                successful,
                required,
                retried,
                backups_tried,
                ..
            } => FailureDetail::QuorumShortfall {
                successful: *successful,
                required: *required,
                retried: retried.clone(),
                backups_tried: backups_tried.clone(),
            },
            RunCouncilError::NoVerdict { attempts, .. } => FailureDetail::ChairmanExhausted {
                attempts: attempts.clone(),
            },
            _ => return None,
        };
        Some(PipelineError {
            stage: self.stage()?,
            reason: self.to_string(),
            detail,
        })
    }
}

/// Input for the RunCouncil use case
#[derive(Debug, Clone)]
pub struct RunCouncilInput {
    /// The question to put to the council
    pub question: Question,
    /// Competitors and chairman
    pub lineup: Lineup,
    /// Whether to generate a conversation title alongside Stage 1
    pub generate_title: bool,
}

impl RunCouncilInput {
    pub fn new(question: Question, lineup: Lineup) -> Self {
        Self {
            question,
            lineup,
            generate_title: false,
        }
    }

    /// Validate raw input into a run request.
    pub fn parse(
        question: &str,
        competitors: Vec<Model>,
        chairman: Model,
    ) -> Result<Self, RunCouncilError> {
        let question = Question::try_new(question)?;
        let lineup = Lineup::new(competitors, chairman)?;
        Ok(Self::new(question, lineup))
    }

    pub fn with_title(mut self) -> Self {
        self.generate_title = true;
        self
    }
}

/// Everything a finished (or partially finished) run produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CouncilReport {
    pub conversation_id: String,
    pub run_id: String,
    pub question: Question,
    pub lineup: Lineup,
    pub stage1: ResponseSet,
    pub stage2: Evaluation,
    pub stage3: Option<ChairmanResult>,
    pub title: Option<String>,
}

impl CouncilReport {
    pub fn verdict(&self) -> Option<&str> {
        self.stage3.as_ref().map(|r| r.verdict_text.as_str())
    }
}
