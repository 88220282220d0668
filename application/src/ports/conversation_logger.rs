//! Port for structured conversation logging.
//!
//! Defines the [`ConversationLogger`] trait for recording the progress events
//! of a council run to a transcript.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port captures what the client was
//! actually shown, in a machine-readable format (JSONL).

use council_domain::SequencedEvent;
use serde_json::Value;

/// A structured conversation event for logging.
pub struct ConversationEvent {
    /// Conversation the run belongs to.
    pub conversation_id: String,
    /// Position of the event in the run's stream.
    pub sequence: u64,
    /// Event type identifier (e.g., "stage1_start", "stage3_retry").
    pub event_type: &'static str,
    /// JSON payload of the event.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(
        conversation_id: impl Into<String>,
        sequence: u64,
        event_type: &'static str,
        payload: Value,
    ) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            sequence,
            event_type,
            payload,
        }
    }

    /// Build a log record from a delivered progress event.
    pub fn from_progress(conversation_id: &str, event: &SequencedEvent) -> Self {
        let payload = serde_json::to_value(&event.event)
            .ok()
            .and_then(|mut value| value.get_mut("data").map(Value::take))
            .unwrap_or(Value::Null);
        Self::new(
            conversation_id,
            event.sequence,
            event.event.kind().as_str(),
            payload,
        )
    }
}

/// Port for logging conversation events to a structured log.
///
/// `log` is synchronous and infallible. Logging failures never interrupt a
/// run.
pub trait ConversationLogger: Send + Sync {
    /// Record a conversation event.
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
