//! HTTP transport for one Rasa channel
//!
//! Each `send` is a single POST. Whatever the server answers is pushed back
//! through the channel's [`PushSink`]: one push per REST message, or one push
//! per parse result.

use super::error::{RasaError, Result};
use super::protocol::{self, ParseRequest, RestRequest};
use async_trait::async_trait;
use rasa_bridge_application::{ChannelTransport, PushSink, TransportError};
use rasa_bridge_domain::util::{preview, truncate_str};
use rasa_bridge_domain::{ChannelConfig, ChannelKind, OutboundMessage};
use reqwest::header::AUTHORIZATION;
use serde::Serialize;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::{debug, info, trace};

/// Longest error body kept in an error message
const MAX_ERROR_BODY: usize = 512;

pub struct HttpChannelTransport {
    config: ChannelConfig,
    pushes: PushSink,
    client: OnceLock<reqwest::Client>,
}

impl HttpChannelTransport {
    pub fn new(config: ChannelConfig, pushes: PushSink) -> Self {
        Self {
            config,
            pushes,
            client: OnceLock::new(),
        }
    }

    fn client(&self) -> Result<&reqwest::Client> {
        self.client.get().ok_or(RasaError::NotBuilt)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.config.authorization_header() {
            Some(value) => request.header(AUTHORIZATION, value),
            None => request,
        }
    }

    async fn post<B: Serialize + ?Sized>(&self, body: &B) -> Result<Value> {
        let request = self.authorize(self.client()?.post(&self.config.url).json(body));
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(RasaError::HttpStatus {
                status: status.as_u16(),
                url: self.config.url.clone(),
                body: truncate_str(&text, MAX_ERROR_BODY).to_string(),
            });
        }

        trace!("{} channel <- {}", self.config.kind, preview(&text, 200));
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn ping(&self, url: &str) -> Result<()> {
        let response = self.authorize(self.client()?.get(url)).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RasaError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
                body: truncate_str(&body, MAX_ERROR_BODY).to_string(),
            });
        }
        debug!("Ping {} ok", url);
        Ok(())
    }

    async fn exchange(&self, message: &OutboundMessage) -> Result<usize> {
        match self.config.kind {
            ChannelKind::Response => {
                let body = self
                    .post(&RestRequest {
                        message: &message.text,
                        sender: &message.sender,
                    })
                    .await?;
                let replies = protocol::rest_replies(body)?;
                let count = replies.len();
                for reply in replies {
                    self.pushes.push(reply);
                }
                Ok(count)
            }
            ChannelKind::Understanding => {
                let body = self
                    .post(&ParseRequest {
                        text: &message.text,
                    })
                    .await?;
                self.pushes.push(protocol::parse_reply(body));
                Ok(1)
            }
        }
    }
}

#[async_trait]
impl ChannelTransport for HttpChannelTransport {
    fn kind(&self) -> ChannelKind {
        self.config.kind
    }

    async fn build(&self) -> std::result::Result<(), TransportError> {
        if self.client.get().is_some() {
            return Ok(());
        }
        let client = reqwest::Client::builder()
            .timeout(self.config.timeout)
            .build()
            .map_err(RasaError::from)?;
        let _ = self.client.set(client);
        Ok(())
    }

    async fn start(&self) -> std::result::Result<(), TransportError> {
        if let Some(url) = &self.config.ping_url {
            self.ping(url).await?;
        }
        info!("{} channel ready at {}", self.config.kind, self.config.url);
        Ok(())
    }

    async fn send(&self, message: &OutboundMessage) -> std::result::Result<(), TransportError> {
        debug!(
            "{} channel -> \"{}\"",
            self.config.kind,
            preview(&message.text, 60)
        );
        let pushed = self.exchange(message).await?;
        debug!("{} channel pushed {} message(s)", self.config.kind, pushed);
        Ok(())
    }
}
