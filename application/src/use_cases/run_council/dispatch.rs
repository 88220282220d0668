//! Stage 1: collect independent answers from the competitors.

use council_domain::{
    FallbackPhase, FallbackPolicy, FallbackStep, Model, ProgressEvent, Prompt, PromptTemplate,
    ResponseSet, Stage1Retry,
};
use tracing::info;

use super::RunCouncilUseCase;
use super::fan_out::invoke_all;
use super::run_handle::RunHandle;
use super::types::{RunCouncilError, RunCouncilInput};
use crate::ports::model_invoker::ModelInvoker;

impl<I: ModelInvoker + 'static> RunCouncilUseCase<I> {
    /// Stage 1: query every competitor in parallel, then retry and fall
    /// back to backups until two answers are in.
    pub(super) async fn stage1_dispatch(
        &self,
        run: &mut RunHandle,
        input: &RunCouncilInput,
    ) -> Result<ResponseSet, RunCouncilError> {
        let competitors = input.lineup.competitors();
        info!(
            conversation = run.conversation_id(),
            "Stage 1: dispatching to {} competitors",
            competitors.len()
        );
        run.emit(ProgressEvent::Stage1Start {}).await?;

        let prompt = PromptTemplate::answer(input.question.content())
            .with_language(self.policy.language());
        let policy = FallbackPolicy::dispatch();

        let mut responses = ResponseSet::new();
        self.dispatch_round(run, competitors.to_vec(), &prompt, &mut responses)
            .await?;

        let mut backups = self.policy.dispatch_backups_for(competitors);
        let mut phase = FallbackPhase::Initial;
        let mut retried: Vec<Model> = Vec::new();
        let mut backups_tried: Vec<Model> = Vec::new();

        loop {
            let step = policy.next_step(
                responses.success_count(),
                phase,
                &responses.failed_models(),
                &backups,
            );
            match step {
                FallbackStep::Satisfied => break,
                FallbackStep::Retry(targets) => {
                    info!(
                        "Stage 1: {} of {} answers, retrying {} failed competitors",
                        responses.success_count(),
                        policy.quorum,
                        targets.len()
                    );
                    run.emit(ProgressEvent::Stage1Retry(Stage1Retry {
                        successful: responses.success_count(),
                        retrying: targets.clone(),
                        backup: false,
                    }))
                    .await?;
                    retried = targets.clone();
                    self.dispatch_round(run, targets, &prompt, &mut responses)
                        .await?;
                    phase = FallbackPhase::Retried;
                }
                FallbackStep::Backup(targets) => {
                    info!(
                        "Stage 1: {} of {} answers, trying backups {:?}",
                        responses.success_count(),
                        policy.quorum,
                        targets.iter().map(Model::as_str).collect::<Vec<_>>()
                    );
                    backups.drain(..targets.len());
                    run.emit(ProgressEvent::Stage1Retry(Stage1Retry {
                        successful: responses.success_count(),
                        retrying: targets.clone(),
                        backup: true,
                    }))
                    .await?;
                    backups_tried.extend(targets.iter().cloned());
                    self.dispatch_round(run, targets, &prompt, &mut responses)
                        .await?;
                    phase = FallbackPhase::Backups;
                }
                FallbackStep::Exhausted => {
                    return Err(RunCouncilError::QuorumNotReached {
                        successful: responses.success_count(),
                        required: policy.quorum,
                        retried,
                        backups_tried,
                        responses,
                    });
                }
            }
        }

        info!(
            "Stage 1 complete: {} of {} dispatched models answered",
            responses.success_count(),
            responses.len()
        );
        run.emit(ProgressEvent::Stage1Complete {
            responses: responses.clone(),
        })
        .await?;
        Ok(responses)
    }

    async fn dispatch_round(
        &self,
        run: &RunHandle,
        models: Vec<Model>,
        prompt: &Prompt,
        responses: &mut ResponseSet,
    ) -> Result<(), RunCouncilError> {
        let targets = models.into_iter().map(|m| (m, prompt.clone())).collect();
        for (model, outcome) in
            invoke_all(&self.invoker, targets, self.policy.call_timeout, run).await?
        {
            responses.record(model, outcome);
        }
        Ok(())
    }
}
