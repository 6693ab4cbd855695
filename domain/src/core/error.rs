//! Domain error types

use crate::channel::kind::ChannelKind;
use crate::channel::lifecycle::LifecycleState;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Endpoint URL is required (set endpoint.url or --endpoint)")]
    MissingEndpoint,

    #[error("Invalid mode: {0} (expected both, response_only or understanding_only)")]
    InvalidMode(String),

    #[error("Invalid {channel} channel lifecycle transition: {from} -> {to}")]
    InvalidTransition {
        channel: ChannelKind,
        from: LifecycleState,
        to: LifecycleState,
    },

    #[error("A correlation is already pending on the {0} channel")]
    CorrelationPending(ChannelKind),

    #[error("The {0} channel is not started")]
    ChannelNotStarted(ChannelKind),
}

impl DomainError {
    /// Check if this error was raised while validating configuration
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            DomainError::MissingEndpoint | DomainError::InvalidMode(_)
        )
    }
}
