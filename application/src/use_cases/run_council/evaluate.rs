//! Stage 2: anonymized cross-ranking.

use council_domain::{
    AnonymizationMap, Evaluation, Label, ModelOutcome, ProgressEvent, Prompt, PromptTemplate,
    Ranking, ResponseSet,
};
use tracing::{debug, info, warn};

use super::RunCouncilUseCase;
use super::fan_out::invoke_all;
use super::run_handle::RunHandle;
use super::types::{RunCouncilError, RunCouncilInput};
use crate::ports::model_invoker::ModelInvoker;

impl<I: ModelInvoker + 'static> RunCouncilUseCase<I> {
    /// Stage 2: every model that answered ranks all anonymized answers.
    ///
    /// Evaluator failures and unparseable rankings only shrink the
    /// aggregate; Stage 2 never fails the run.
    pub(super) async fn stage2_evaluate(
        &self,
        run: &mut RunHandle,
        input: &RunCouncilInput,
        responses: &ResponseSet,
    ) -> Result<Evaluation, RunCouncilError> {
        run.emit(ProgressEvent::Stage2Start {}).await?;

        let map = AnonymizationMap::from_responses(responses);
        let anonymized: Vec<(Label, &str)> = responses
            .successes()
            .filter_map(|(model, text)| map.label_for(model).map(|label| (label.clone(), text)))
            .collect();
        info!(
            conversation = run.conversation_id(),
            "Stage 2: {} evaluators ranking {} anonymized answers",
            anonymized.len(),
            map.len()
        );

        let prompt: Prompt =
            PromptTemplate::ranking(input.question.content(), &anonymized)
                .with_language(self.policy.language());
        let targets = responses
            .successes()
            .map(|(model, _)| (model.clone(), prompt.clone()))
            .collect();

        let mut rankings = Vec::new();
        for (model, outcome) in
            invoke_all(&self.invoker, targets, self.policy.call_timeout, run).await?
        {
            match outcome {
                ModelOutcome::Success { text } => {
                    let ranking = Ranking::parse(model, text, &map);
                    if ranking.parsed_labels.is_empty() {
                        warn!("No ranking could be parsed from {}", ranking.model);
                    } else {
                        debug!(
                            "{} ranked {:?}",
                            ranking.model,
                            ranking
                                .parsed_labels
                                .iter()
                                .map(Label::as_str)
                                .collect::<Vec<_>>()
                        );
                    }
                    rankings.push(ranking);
                }
                ModelOutcome::Failure { kind, message } => {
                    warn!("Evaluator {} failed ({}): {}", model, kind, message);
                }
            }
        }

        let evaluation = Evaluation::new(map, rankings);
        run.emit(ProgressEvent::Stage2Complete(evaluation.clone()))
            .await?;
        Ok(evaluation)
    }
}
