//! Channel transport port
//!
//! Defines the interface a backend channel implementation must expose.
//! The application layer never performs I/O itself: it calls `send` and
//! receives inbound messages through the [`PushSink`] a transport is given
//! at construction.

use crate::correlation::PushSink;
use async_trait::async_trait;
use rasa_bridge_domain::{ChannelConfig, ChannelKind, OutboundMessage};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by a channel transport
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// A backend channel implementation.
///
/// Lifecycle hooks default to no-ops: transports that do not need a step
/// simply do not override it, and the session treats that as success.
///
/// `send` completing says only that the message was dispatched. Replies
/// arrive separately, zero or more per send, through the [`PushSink`].
#[async_trait]
pub trait ChannelTransport: Send + Sync {
    /// Which channel this transport serves
    fn kind(&self) -> ChannelKind;

    /// Prepare resources (clients, connections)
    async fn build(&self) -> Result<(), TransportError> {
        Ok(())
    }

    /// Begin serving (health checks, subscriptions)
    async fn start(&self) -> Result<(), TransportError> {
        Ok(())
    }

    /// Dispatch one outbound message
    async fn send(&self, message: &OutboundMessage) -> Result<(), TransportError>;

    /// Stop serving
    async fn stop(&self) -> Result<(), TransportError> {
        Ok(())
    }

    /// Free resources
    async fn release(&self) -> Result<(), TransportError> {
        Ok(())
    }
}

/// Creates transports for a session.
///
/// Called once per active channel, after every channel configuration has
/// been validated.
pub trait TransportFactory: Send + Sync {
    fn create(
        &self,
        config: ChannelConfig,
        pushes: PushSink,
    ) -> Result<Arc<dyn ChannelTransport>, TransportError>;
}
