//! Chat session use case
//!
//! A [`ChatSession`] validates its configuration once, builds and starts one
//! channel per active [`Mode`] channel, then runs turns until stopped.

use crate::channel::{ChannelError, ChannelHandle};
use crate::config::{ModeSelector, SessionConfig};
use crate::correlation::{PushSink, ResponseCorrelator};
use crate::ports::channel_transport::{TransportError, TransportFactory};
use crate::ports::conversation_logger::{
    events, ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::progress::{NoProgress, TurnProgressNotifier};
use crate::ports::reply_sink::ReplySink;
use crate::use_cases::send_turn::{TurnError, TurnOrchestrator, TurnReport};
use rasa_bridge_domain::{ChannelConfig, ChannelKind, DomainError, Mode, OutboundMessage};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur while starting or stopping a session
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Invalid session configuration: {0}")]
    Config(DomainError),

    #[error("Failed to create {channel} transport: {source}")]
    Create {
        channel: ChannelKind,
        source: TransportError,
    },

    #[error(transparent)]
    Channel(#[from] ChannelError),
}

impl SessionError {
    pub fn is_config_error(&self) -> bool {
        matches!(self, SessionError::Config(_))
    }
}

/// A running conversation against the active channels.
pub struct ChatSession {
    mode: Mode,
    sender: String,
    channels: Vec<Arc<ChannelHandle>>,
    orchestrator: TurnOrchestrator,
    logger: Arc<dyn ConversationLogger>,
}

impl ChatSession {
    /// Start a session without a transcript.
    pub async fn start(
        config: SessionConfig,
        factory: &dyn TransportFactory,
        sink: Arc<dyn ReplySink>,
    ) -> Result<Self, SessionError> {
        Self::start_with_logger(config, factory, sink, Arc::new(NoConversationLogger)).await
    }

    /// Start a session.
    ///
    /// Configuration is validated in full before the factory is called:
    /// an invalid mode or missing endpoint never constructs a channel.
    pub async fn start_with_logger(
        config: SessionConfig,
        factory: &dyn TransportFactory,
        sink: Arc<dyn ReplySink>,
        logger: Arc<dyn ConversationLogger>,
    ) -> Result<Self, SessionError> {
        let mode = ModeSelector::validate(&config).map_err(SessionError::Config)?;
        let configs = mode
            .channels()
            .iter()
            .map(|kind| ChannelConfig::configure(*kind, &config.endpoint))
            .collect::<Result<Vec<_>, _>>()
            .map_err(SessionError::Config)?;
        let sender = config.resolve_sender();

        info!("Starting session in {} mode as {}", mode, sender);

        let mut channels = Vec::with_capacity(configs.len());
        for channel_config in configs {
            let kind = channel_config.kind;
            let correlator = ResponseCorrelator::new(kind);
            let pushes = PushSink::new(Arc::clone(&correlator));
            let transport = match factory.create(channel_config.clone(), pushes) {
                Ok(transport) => transport,
                Err(source) => {
                    Self::teardown(&channels).await;
                    return Err(SessionError::Create {
                        channel: kind,
                        source,
                    });
                }
            };
            debug!("Created {} transport for {}", kind, channel_config.url);
            channels.push(Arc::new(ChannelHandle::new(
                channel_config,
                transport,
                correlator,
            )));
        }

        if let Err(e) = Self::bring_up(&channels).await {
            warn!("Session start failed: {}", e);
            Self::teardown(&channels).await;
            return Err(e.into());
        }

        logger.log(ConversationEvent::new(
            events::SESSION_STARTED,
            json!({
                "mode": mode.to_string(),
                "sender": sender,
                "channels": mode.channels(),
            }),
        ));

        let orchestrator = TurnOrchestrator::new(mode, channels.clone(), sink)
            .with_logger(Arc::clone(&logger));

        Ok(Self {
            mode,
            sender,
            channels,
            orchestrator,
            logger,
        })
    }

    async fn bring_up(channels: &[Arc<ChannelHandle>]) -> Result<(), ChannelError> {
        for channel in channels {
            channel.validate()?;
        }
        for channel in channels {
            channel.build().await?;
        }
        for channel in channels {
            channel.start().await?;
        }
        Ok(())
    }

    /// Best-effort stop and release of partially started channels.
    async fn teardown(channels: &[Arc<ChannelHandle>]) {
        for channel in channels {
            if let Err(e) = channel.stop().await {
                debug!("Teardown stop: {}", e);
            }
            if let Err(e) = channel.release().await {
                debug!("Teardown release: {}", e);
            }
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn channels(&self) -> &[Arc<ChannelHandle>] {
        &self.channels
    }

    /// Run one turn with default (no-op) progress
    pub async fn send_turn(&self, text: impl Into<String>) -> Result<TurnReport, TurnError> {
        self.send_turn_with_progress(text, &NoProgress).await
    }

    /// Run one turn with progress callbacks
    pub async fn send_turn_with_progress(
        &self,
        text: impl Into<String>,
        progress: &dyn TurnProgressNotifier,
    ) -> Result<TurnReport, TurnError> {
        let message = OutboundMessage::new(text, self.sender.clone());
        self.orchestrator
            .execute_with_progress(message, progress)
            .await
    }

    /// Stop and release every channel.
    ///
    /// Runs even while a turn is in flight; that turn ends as abandoned.
    /// Every channel is torn down; the first error is returned.
    pub async fn stop(&self) -> Result<(), SessionError> {
        info!("Stopping session {}", self.sender);
        let mut first_error = None;
        for channel in &self.channels {
            let result = match channel.stop().await {
                Ok(()) => channel.release().await,
                Err(e) => {
                    // Still free the transport
                    if let Err(release) = channel.release().await {
                        debug!("Release after failed stop: {}", release);
                    }
                    Err(e)
                }
            };
            if let Err(e) = result {
                warn!("Failed to stop {} channel: {}", channel.kind(), e);
                first_error.get_or_insert(e);
            }
        }

        self.logger.log(ConversationEvent::new(
            events::SESSION_STOPPED,
            json!({ "sender": self.sender, "ok": first_error.is_none() }),
        ));

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}
