//! Stage 3: chairman synthesis with self-retry and sequential backups.

use council_domain::{
    ChairmanAttempt, ChairmanResult, Evaluation, FailureKind, FallbackPhase, FallbackPolicy,
    FallbackStep, Model, ModelOutcome, ProgressEvent, Prompt, PromptTemplate, ResponseSet,
};
use tracing::{info, warn};

use super::RunCouncilUseCase;
use super::fan_out::invoke_all;
use super::run_handle::RunHandle;
use super::types::{RunCouncilError, RunCouncilInput};
use crate::ports::model_invoker::ModelInvoker;

/// How Stage 3 ended, short of cancellation.
pub(super) enum Synthesis {
    Verdict(ChairmanResult),
    Exhausted(Vec<ChairmanAttempt>),
}

impl<I: ModelInvoker + 'static> RunCouncilUseCase<I> {
    /// Stage 3: ask the chairman for the verdict, retry it once, then try
    /// backups one at a time.
    pub(super) async fn stage3_synthesize(
        &self,
        run: &mut RunHandle,
        input: &RunCouncilInput,
        responses: &ResponseSet,
        evaluation: &Evaluation,
    ) -> Result<Synthesis, RunCouncilError> {
        run.emit(ProgressEvent::Stage3Start {}).await?;

        let answers: Vec<_> = responses.successes().collect();
        let prompt = PromptTemplate::verdict(
            input.question.content(),
            &answers,
            evaluation,
        )
        .with_language(self.policy.language());

        let chairman = input.lineup.chairman().clone();
        let policy = FallbackPolicy::chairman();
        let mut backups = self.policy.chairman_backups_for(&chairman);
        let mut phase = FallbackPhase::Initial;
        let mut attempts: Vec<ChairmanAttempt> = Vec::new();
        let mut target = chairman.clone();

        info!(
            conversation = run.conversation_id(),
            "Stage 3: chairman {} synthesizing", chairman
        );

        loop {
            let outcome = self.invoke_chairman(run, &target, &prompt).await?;
            attempts.push(ChairmanAttempt {
                model: target.clone(),
                outcome: (&outcome).into(),
                attempt_index: attempts.len(),
            });

            match outcome {
                ModelOutcome::Success { text } => {
                    info!("Stage 3 complete: verdict from {}", target);
                    let result = ChairmanResult {
                        model: target,
                        verdict_text: text,
                        attempts,
                    };
                    run.emit(ProgressEvent::Stage3Complete(result.clone()))
                        .await?;
                    return Ok(Synthesis::Verdict(result));
                }
                ModelOutcome::Failure { kind, message } => {
                    warn!("Chairman attempt by {} failed ({}): {}", target, kind, message);
                }
            }

            let next = match policy.next_step(0, phase, std::slice::from_ref(&chairman), &backups)
            {
                FallbackStep::Retry(targets) => {
                    phase = FallbackPhase::Retried;
                    targets.into_iter().next()
                }
                FallbackStep::Backup(targets) => {
                    phase = FallbackPhase::Backups;
                    backups.drain(..targets.len());
                    targets.into_iter().next()
                }
                FallbackStep::Satisfied | FallbackStep::Exhausted => None,
            };
            let Some(next) = next else {
                warn!("Stage 3 exhausted after {} attempts", attempts.len());
                return Ok(Synthesis::Exhausted(attempts));
            };

            run.emit(ProgressEvent::Stage3Retry {
                attempts: attempts.clone(),
            })
            .await?;
            target = next;
        }
    }

    async fn invoke_chairman(
        &self,
        run: &RunHandle,
        model: &Model,
        prompt: &Prompt,
    ) -> Result<ModelOutcome, RunCouncilError> {
        let mut outcomes = invoke_all(
            &self.invoker,
            vec![(model.clone(), prompt.clone())],
            self.policy.call_timeout,
            run,
        )
        .await?;
        Ok(outcomes
            .pop()
            .map(|(_, outcome)| outcome)
            .unwrap_or_else(|| ModelOutcome::failure(FailureKind::Unknown, "no outcome")))
    }
}
