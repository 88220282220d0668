//! Per-run context and single-flight registry.
//!
//! A conversation may only have one council run in flight at a time.
//! [`ActiveRuns::begin`] hands out a [`RunHandle`] that holds the
//! conversation's slot until it is dropped.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use council_domain::ProgressEvent;
use tracing::debug;
use uuid::Uuid;

use super::types::RunCouncilError;
use crate::ports::progress::{EmitError, ProgressEmitter};

/// Registry of conversations with a run in progress
#[derive(Debug, Clone, Default)]
pub struct ActiveRuns {
    inner: Arc<Mutex<HashSet<String>>>,
}

impl ActiveRuns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `conversation_id` for a new run.
    pub fn begin(
        &self,
        conversation_id: impl Into<String>,
        emitter: ProgressEmitter,
    ) -> Result<RunHandle, RunCouncilError> {
        let conversation_id = conversation_id.into();
        let inserted = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(conversation_id.clone());
        if !inserted {
            return Err(RunCouncilError::AlreadyRunning(conversation_id));
        }

        let run_id = Uuid::new_v4();
        debug!(conversation = %conversation_id, run = %run_id, "Run started");
        Ok(RunHandle {
            conversation_id: conversation_id.clone(),
            run_id,
            emitter,
            _slot: RunSlot {
                conversation_id,
                runs: Arc::clone(&self.inner),
            },
        })
    }

    pub fn is_active(&self, conversation_id: &str) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(conversation_id)
    }
}

/// Releases a conversation's slot on drop.
#[derive(Debug)]
struct RunSlot {
    conversation_id: String,
    runs: Arc<Mutex<HashSet<String>>>,
}

impl Drop for RunSlot {
    fn drop(&mut self) {
        self.runs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.conversation_id);
        debug!(conversation = %self.conversation_id, "Run slot released");
    }
}

/// Context of one run, passed explicitly to every stage.
#[derive(Debug)]
pub struct RunHandle {
    conversation_id: String,
    run_id: Uuid,
    emitter: ProgressEmitter,
    _slot: RunSlot,
}

impl RunHandle {
    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub async fn emit(&mut self, event: ProgressEvent) -> Result<(), EmitError> {
        self.emitter.emit(event).await
    }

    pub fn emitter(&self) -> &ProgressEmitter {
        &self.emitter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::progress::progress_channel;

    #[test]
    fn test_single_flight_per_conversation() {
        let runs = ActiveRuns::new();
        let (emitter, _stream) = progress_channel(4);
        let handle = runs.begin("conv-1", emitter).unwrap();
        assert!(runs.is_active("conv-1"));

        let (emitter, _stream2) = progress_channel(4);
        let err = runs.begin("conv-1", emitter).unwrap_err();
        assert!(matches!(err, RunCouncilError::AlreadyRunning(ref id) if id == "conv-1"));

        let (emitter, _stream3) = progress_channel(4);
        assert!(runs.begin("conv-2", emitter).is_ok());

        drop(handle);
        assert!(!runs.is_active("conv-1"));
        let (emitter, _stream4) = progress_channel(4);
        assert!(runs.begin("conv-1", emitter).is_ok());
    }

    #[test]
    fn test_run_ids_are_unique() {
        let runs = ActiveRuns::new();
        let (a, _sa) = progress_channel(1);
        let (b, _sb) = progress_channel(1);
        let first = runs.begin("a", a).unwrap();
        let second = runs.begin("b", b).unwrap();
        assert_ne!(first.run_id(), second.run_id());
    }
}
