//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! must implement.

pub mod channel_transport;
pub mod conversation_logger;
pub mod progress;
pub mod reply_sink;
