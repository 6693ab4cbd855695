//! Port for structured turn transcripts.
//!
//! Defines the [`ConversationLogger`] trait for recording what happened in
//! each turn (message dispatched, replies correlated, deliveries emitted,
//! failures) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port captures a machine-readable
//! transcript (JSONL) that a test run can be audited against.

use serde_json::Value;

/// Event type identifiers written by the session.
pub mod events {
    pub const SESSION_STARTED: &str = "session_started";
    pub const TURN_DISPATCHED: &str = "turn_dispatched";
    pub const CHANNEL_REPLY: &str = "channel_reply";
    pub const TURN_EMITTED: &str = "turn_emitted";
    pub const SPILLOVER_FLUSHED: &str = "spillover_flushed";
    pub const TURN_FAILED: &str = "turn_failed";
    pub const SESSION_STOPPED: &str = "session_stopped";
}

/// A structured transcript event.
pub struct ConversationEvent {
    /// Event type identifier (see [`events`]).
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

/// Port for logging transcript events.
///
/// `log` is synchronous and non-fallible: a transcript write failure must
/// never fail a turn.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when transcripts are disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
