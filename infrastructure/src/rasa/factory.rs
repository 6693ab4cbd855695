//! Transport factory for Rasa HTTP channels

use super::transport::HttpChannelTransport;
use rasa_bridge_application::{ChannelTransport, PushSink, TransportError, TransportFactory};
use rasa_bridge_domain::ChannelConfig;
use std::sync::Arc;
use tracing::debug;

/// Creates one [`HttpChannelTransport`] per channel.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpTransportFactory;

impl HttpTransportFactory {
    pub fn new() -> Self {
        Self
    }
}

impl TransportFactory for HttpTransportFactory {
    fn create(
        &self,
        config: ChannelConfig,
        pushes: PushSink,
    ) -> Result<Arc<dyn ChannelTransport>, TransportError> {
        debug!("Creating HTTP transport for {} channel", config.kind);
        Ok(Arc::new(HttpChannelTransport::new(config, pushes)))
    }
}
