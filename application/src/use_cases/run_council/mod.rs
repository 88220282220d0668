//! Run Council use case
//!
//! Orchestrates the three-stage council:
//!
//! 1. **Dispatch** ([`dispatch`]): every competitor answers in parallel;
//!    failed competitors are retried once, then backups are brought in
//!    until two answers exist.
//! 2. **Evaluate** ([`evaluate`]): the answers are labeled `Response A`,
//!    `Response B`, ... and every answering model ranks all of them.
//! 3. **Synthesize** ([`chairman`]): the chairman writes the verdict,
//!    retrying itself once and then trying backups one at a time.
//!
//! Progress goes out through the run's [`RunHandle`] as an ordered event
//! stream. A title for the conversation is generated alongside Stage 1 when
//! requested.

mod chairman;
mod dispatch;
mod evaluate;
mod fan_out;
pub mod run_handle;
pub mod types;

pub use run_handle::{ActiveRuns, RunHandle};
pub use types::{CouncilReport, RunCouncilError, RunCouncilInput};

use std::sync::Arc;

use council_domain::ProgressEvent;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use self::chairman::Synthesis;
use crate::config::CouncilPolicy;
use crate::ports::model_invoker::ModelInvoker;
use crate::ports::title_generator::{DEFAULT_TITLE, TitleGenerator};
use crate::use_cases::generate_title::ModelTitleGenerator;

/// Use case for running a council over one question
pub struct RunCouncilUseCase<I: ModelInvoker + 'static> {
    invoker: Arc<I>,
    policy: CouncilPolicy,
    titles: Arc<dyn TitleGenerator>,
}

impl<I: ModelInvoker + 'static> RunCouncilUseCase<I> {
    /// Titles come from the policy's title model through the same invoker.
    pub fn new(invoker: Arc<I>, policy: CouncilPolicy) -> Self {
        let titles = Arc::new(ModelTitleGenerator::from_policy(Arc::clone(&invoker), &policy));
        Self {
            invoker,
            policy,
            titles,
        }
    }

    /// Execute a run, reporting progress through `run`.
    ///
    /// Pipeline failures (no quorum in Stage 1, no verdict in Stage 3) are
    /// emitted as an `error` event before being returned.
    pub async fn execute(
        &self,
        input: RunCouncilInput,
        mut run: RunHandle,
    ) -> Result<CouncilReport, RunCouncilError> {
        info!(
            conversation = run.conversation_id(),
            run = %run.run_id(),
            "Starting council with {} competitors, chairman {}",
            input.lineup.competitors().len(),
            input.lineup.chairman()
        );

        let mut title_task = JoinSet::new();
        if input.generate_title {
            let titles = Arc::clone(&self.titles);
            let question = input.question.content().to_string();
            title_task.spawn(async move { titles.generate(&question).await });
        }

        let result = self.run_stages(&input, &mut run, &mut title_task).await;

        if let Err(error) = &result
            && let Some(payload) = error.pipeline_error()
        {
            warn!(
                conversation = run.conversation_id(),
                "Council failed in {}: {}", payload.stage, payload.reason
            );
            if let Err(e) = run.emit(ProgressEvent::Error(payload)).await {
                debug!("Could not deliver error event: {}", e);
            }
        }

        result
    }

    async fn run_stages(
        &self,
        input: &RunCouncilInput,
        run: &mut RunHandle,
        title_task: &mut JoinSet<String>,
    ) -> Result<CouncilReport, RunCouncilError> {
        // Stage 1: Dispatch
        let responses = self.stage1_dispatch(run, input).await?;

        // Stage 2: Cross-evaluation
        let evaluation = self.stage2_evaluate(run, input, &responses).await?;

        let mut report = CouncilReport {
            conversation_id: run.conversation_id().to_string(),
            run_id: run.run_id().to_string(),
            question: input.question.clone(),
            lineup: input.lineup.clone(),
            stage1: responses,
            stage2: evaluation,
            stage3: None,
            title: None,
        };

        // Stage 3: Synthesis
        match self
            .stage3_synthesize(run, input, &report.stage1, &report.stage2)
            .await?
        {
            Synthesis::Verdict(result) => report.stage3 = Some(result),
            Synthesis::Exhausted(attempts) => {
                return Err(RunCouncilError::NoVerdict {
                    attempts,
                    partial: Box::new(report),
                });
            }
        }

        report.title = match title_task.join_next().await {
            Some(Ok(title)) => Some(title),
            Some(Err(e)) => {
                warn!("Title task failed: {}", e);
                Some(DEFAULT_TITLE.to_string())
            }
            None => None,
        };

        run.emit(ProgressEvent::TitleComplete {
            title: report.title.clone(),
        })
        .await?;
        run.emit(ProgressEvent::Complete {}).await?;

        info!(conversation = run.conversation_id(), "Council complete");
        Ok(report)
    }
}
