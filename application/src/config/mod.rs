//! Application-level configuration.
//!
//! - [`SessionConfig`] - what a caller supplies to start a session
//! - [`ModeSelector`] - validates a session configuration into a [`Mode`](rasa_bridge_domain::Mode)

pub mod session_config;

pub use session_config::{ModeSelector, SessionConfig};
