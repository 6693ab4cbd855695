//! Rasa HTTP adapter
//!
//! Implements the [`ChannelTransport`](rasa_bridge_application::ChannelTransport)
//! port over the Rasa REST webhook and NLU parse endpoints.

pub mod error;
pub mod factory;
pub mod protocol;
pub mod transport;
