//! Concurrent invocation of a batch of models.

use std::sync::Arc;
use std::time::Duration;

use council_domain::{FailureKind, Model, ModelOutcome, Prompt};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::run_handle::RunHandle;
use super::types::RunCouncilError;
use crate::ports::model_invoker::{ModelInvoker, invoke_with_deadline};

/// Invoke every `(model, prompt)` pair concurrently.
///
/// Outcomes come back in the order of `targets`, whatever order the calls
/// finish in. If the progress stream is dropped while calls are in flight,
/// the remaining calls are aborted and the batch fails with
/// [`RunCouncilError::Cancelled`].
pub(super) async fn invoke_all<I: ModelInvoker + 'static>(
    invoker: &Arc<I>,
    targets: Vec<(Model, Prompt)>,
    timeout: Duration,
    run: &RunHandle,
) -> Result<Vec<(Model, ModelOutcome)>, RunCouncilError> {
    let mut join_set = JoinSet::new();
    let models: Vec<Model> = targets.iter().map(|(m, _)| m.clone()).collect();

    for (index, (model, prompt)) in targets.into_iter().enumerate() {
        let invoker = Arc::clone(invoker);
        join_set.spawn(async move {
            let outcome = invoke_with_deadline(invoker.as_ref(), &model, &prompt, timeout).await;
            (index, outcome)
        });
    }

    let mut slots: Vec<Option<ModelOutcome>> = vec![None; models.len()];

    loop {
        tokio::select! {
            joined = join_set.join_next() => match joined {
                Some(Ok((index, outcome))) => {
                    match &outcome {
                        ModelOutcome::Success { .. } => {
                            info!("Model {} responded successfully", models[index]);
                        }
                        ModelOutcome::Failure { kind, message } => {
                            warn!("Model {} failed ({}): {}", models[index], kind, message);
                        }
                    }
                    slots[index] = Some(outcome);
                }
                Some(Err(e)) => {
                    warn!("Task join error: {}", e);
                }
                None => break,
            },
            _ = run.emitter().closed() => {
                debug!(
                    conversation = run.conversation_id(),
                    "Progress stream closed, aborting {} in-flight calls",
                    join_set.len()
                );
                join_set.abort_all();
                return Err(RunCouncilError::Cancelled);
            }
        }
    }

    Ok(models
        .into_iter()
        .zip(slots)
        .map(|(model, slot)| {
            let outcome = slot.unwrap_or_else(|| {
                ModelOutcome::failure(FailureKind::Unknown, "invocation task failed")
            });
            (model, outcome)
        })
        .collect())
}
