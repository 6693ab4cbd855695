//! Channel handle: one backend channel owned by a session.
//!
//! Wraps a [`ChannelTransport`] with its immutable [`ChannelConfig`], the
//! channel's [`ResponseCorrelator`] and lifecycle tracking. Out-of-order
//! lifecycle calls are rejected before they reach the transport.

use crate::correlation::ResponseCorrelator;
use crate::ports::channel_transport::{ChannelTransport, TransportError};
use rasa_bridge_domain::{ChannelConfig, ChannelKind, DomainError, LifecycleState, OutboundMessage};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Errors raised while driving a channel's lifecycle
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    #[error(transparent)]
    Lifecycle(#[from] DomainError),

    #[error("{channel} channel failed to {operation}: {source}")]
    Transport {
        channel: ChannelKind,
        operation: &'static str,
        source: TransportError,
    },
}

/// One backend channel of a session.
pub struct ChannelHandle {
    config: ChannelConfig,
    transport: Arc<dyn ChannelTransport>,
    correlator: Arc<ResponseCorrelator>,
    state: Mutex<LifecycleState>,
}

impl ChannelHandle {
    pub fn new(
        config: ChannelConfig,
        transport: Arc<dyn ChannelTransport>,
        correlator: Arc<ResponseCorrelator>,
    ) -> Self {
        Self {
            config,
            transport,
            correlator,
            state: Mutex::new(LifecycleState::Created),
        }
    }

    pub fn kind(&self) -> ChannelKind {
        self.config.kind
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    pub fn correlator(&self) -> &Arc<ResponseCorrelator> {
        &self.correlator
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check(&self, next: LifecycleState) -> Result<(), ChannelError> {
        self.state().transition(self.kind(), next)?;
        Ok(())
    }

    fn set_state(&self, next: LifecycleState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = next;
        debug!("{} channel is {}", self.kind(), next);
    }

    fn transport_error(&self, operation: &'static str, source: TransportError) -> ChannelError {
        ChannelError::Transport {
            channel: self.kind(),
            operation,
            source,
        }
    }

    /// Check that the transport matches the configured channel.
    pub fn validate(&self) -> Result<(), ChannelError> {
        self.check(LifecycleState::Validated)?;
        if self.transport.kind() != self.kind() {
            return Err(self.transport_error(
                "validate",
                TransportError::Other(format!(
                    "transport serves the {} channel",
                    self.transport.kind()
                )),
            ));
        }
        self.set_state(LifecycleState::Validated);
        Ok(())
    }

    pub async fn build(&self) -> Result<(), ChannelError> {
        self.check(LifecycleState::Built)?;
        self.transport
            .build()
            .await
            .map_err(|e| self.transport_error("build", e))?;
        self.set_state(LifecycleState::Built);
        Ok(())
    }

    /// Start the transport, then begin accepting pushes.
    pub async fn start(&self) -> Result<(), ChannelError> {
        self.check(LifecycleState::Started)?;
        self.transport
            .start()
            .await
            .map_err(|e| self.transport_error("start", e))?;
        self.correlator.attach();
        self.set_state(LifecycleState::Started);
        Ok(())
    }

    /// Stop accepting pushes, then stop the transport.
    ///
    /// Safe to call while a turn is waiting on this channel: the waiter
    /// observes the turn as abandoned.
    pub async fn stop(&self) -> Result<(), ChannelError> {
        self.check(LifecycleState::Stopped)?;
        self.correlator.detach();
        self.set_state(LifecycleState::Stopped);
        self.transport
            .stop()
            .await
            .map_err(|e| self.transport_error("stop", e))
    }

    pub async fn release(&self) -> Result<(), ChannelError> {
        self.check(LifecycleState::Released)?;
        self.correlator.detach();
        self.set_state(LifecycleState::Released);
        self.transport
            .release()
            .await
            .map_err(|e| self.transport_error("release", e))
    }

    /// Spawn the send of `message`.
    ///
    /// The returned handle completes when the message has been dispatched.
    /// A failure also resolves whatever is waiting on this channel.
    pub fn dispatch(&self, message: OutboundMessage) -> JoinHandle<Result<(), TransportError>> {
        let transport = Arc::clone(&self.transport);
        let correlator = Arc::clone(&self.correlator);
        let kind = self.kind();

        tokio::spawn(async move {
            let result = transport.send(&message).await;
            if let Err(e) = &result {
                warn!("Dispatch on {} channel failed: {}", kind, e);
                correlator.fail(e.clone());
            }
            result
        })
    }
}

impl std::fmt::Debug for ChannelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelHandle")
            .field("config", &self.config)
            .field("state", &self.state())
            .finish()
    }
}
