//! Progress stream port
//!
//! A council run reports its advancement through a bounded channel of
//! [`SequencedEvent`]s. The [`ProgressEmitter`] half stamps every event
//! with its position and refuses events that would break the
//! [`EventOrder`] contract. The [`ProgressStream`] half is handed to
//! whoever presents progress to the user.
//!
//! Dropping the stream is how a client cancels a run: the next emit fails
//! with [`EmitError::Disconnected`] and in-flight calls are aborted.

use council_domain::{EventOrder, OrderViolation, ProgressEvent, SequencedEvent};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::debug;

/// Errors raised while emitting a progress event
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmitError {
    #[error("Progress event out of order: {0}")]
    OutOfOrder(#[from] OrderViolation),

    #[error("Progress stream disconnected")]
    Disconnected,
}

/// Create a connected emitter/stream pair holding at most `capacity`
/// undelivered events.
pub fn progress_channel(capacity: usize) -> (ProgressEmitter, ProgressStream) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (
        ProgressEmitter {
            tx,
            next_sequence: 0,
            order: EventOrder::new(),
        },
        ProgressStream { rx },
    )
}

/// Sending half of a progress stream
#[derive(Debug)]
pub struct ProgressEmitter {
    tx: mpsc::Sender<SequencedEvent>,
    next_sequence: u64,
    order: EventOrder,
}

impl ProgressEmitter {
    /// Validate, stamp and deliver one event.
    ///
    /// Waits while the stream is full, so a slow consumer slows the run
    /// down instead of losing events.
    pub async fn emit(&mut self, event: ProgressEvent) -> Result<(), EmitError> {
        self.order.advance(event.kind())?;
        let sequence = self.next_sequence;
        debug!(sequence, kind = %event.kind(), "Emitting progress event");
        self.tx
            .send(SequencedEvent { sequence, event })
            .await
            .map_err(|_| EmitError::Disconnected)?;
        self.next_sequence += 1;
        Ok(())
    }

    /// Number of events delivered so far.
    pub fn emitted(&self) -> u64 {
        self.next_sequence
    }

    /// Whether a terminal event has been emitted.
    pub fn is_finished(&self) -> bool {
        self.order.is_finished()
    }

    /// Whether the receiving side is gone.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Resolves once the receiving side is gone.
    pub async fn closed(&self) {
        self.tx.closed().await
    }
}

/// Receiving half of a progress stream
#[derive(Debug)]
pub struct ProgressStream {
    rx: mpsc::Receiver<SequencedEvent>,
}

impl ProgressStream {
    /// Next event, or `None` once the run has finished and the emitter is
    /// dropped.
    pub async fn next(&mut self) -> Option<SequencedEvent> {
        self.rx.recv().await
    }

    /// Drain the stream until the emitter is dropped.
    pub async fn collect(mut self) -> Vec<SequencedEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.rx.recv().await {
            events.push(event);
        }
        events
    }
}
