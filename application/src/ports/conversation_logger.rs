//! Port for structured conversation logging.
//!
//! Defines the [`ConversationLogger`] trait for recording pipeline events
//! (intermediate answers, the final answer, failures) to an audit transcript.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the answers
//! each stage produced in a machine-readable format (JSONL). Intermediate
//! answers are recorded here and nowhere else.

use serde_json::Value;

/// A structured pipeline event for logging.
pub struct ConversationEvent {
    /// Event type identifier (e.g., "initial_answer", "final_answer").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging pipeline events to a structured log.
///
/// `log` is synchronous and infallible; logging failures never affect a run.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when the transcript is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
