//! Application layer for rasa-bridge
//!
//! This crate contains the session and turn use cases, response
//! correlation, and the port definitions adapters implement.
//! It depends only on the domain layer.

pub mod channel;
pub mod config;
pub mod correlation;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use channel::{ChannelError, ChannelHandle};
pub use config::{ModeSelector, SessionConfig};
pub use correlation::{PendingCorrelation, PushOutcome, PushSink, ResponseCorrelator};
pub use ports::{
    channel_transport::{ChannelTransport, TransportError, TransportFactory},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    progress::{NoProgress, TurnProgressNotifier},
    reply_sink::{ChannelReplySink, ReplySink},
};
pub use use_cases::send_turn::{TurnError, TurnOrchestrator, TurnReport};
pub use use_cases::session::{ChatSession, SessionError};
