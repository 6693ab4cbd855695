//! Channel transport configuration.
//!
//! [`EndpointSettings`] is what a session supplies; [`ChannelConfig::configure`]
//! turns it into the immutable per-channel configuration a transport consumes.

use crate::channel::kind::ChannelKind;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default request timeout for channel transports.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Path used to build the default health-check URL of the Response channel.
const PING_PATH: &str = "version";

/// Endpoint settings shared by all channels of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointSettings {
    /// Base URL of the server, without endpoint path
    pub url: Option<String>,
    /// Token appended as `?token=` query parameter
    pub token: Option<String>,
    /// JWT sent as `Authorization: Bearer` header
    pub jwt: Option<String>,
    /// Explicit health-check URL for the Response channel
    pub ping_url: Option<String>,
    /// Override for the Response channel path
    pub rest_path: Option<String>,
    /// Override for the Understanding channel path
    pub nlu_path: Option<String>,
    /// Request timeout, consumed by the transport only
    pub timeout: Duration,
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            url: None,
            token: None,
            jwt: None,
            ping_url: None,
            rest_path: None,
            nlu_path: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl EndpointSettings {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_jwt(mut self, jwt: impl Into<String>) -> Self {
        self.jwt = Some(jwt.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base URL, if one is set and not blank.
    pub fn base_url(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }

    fn path_for(&self, kind: ChannelKind) -> &str {
        let path = match kind {
            ChannelKind::Response => self.rest_path.as_deref(),
            ChannelKind::Understanding => self.nlu_path.as_deref(),
        };
        path.map(|p| p.trim_start_matches('/'))
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| kind.default_path())
    }

    /// Compose `<base>/<path>[?token=<token>]`.
    fn compose_url(&self, base: &str, path: &str) -> String {
        let mut url = base.to_string();
        if !url.ends_with('/') {
            url.push('/');
        }
        url.push_str(path);
        if let Some(token) = self.token.as_deref().filter(|t| !t.is_empty()) {
            url.push_str("?token=");
            url.push_str(token);
        }
        url
    }
}

/// Immutable transport configuration of one channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub kind: ChannelKind,
    /// Fully composed endpoint URL
    pub url: String,
    /// Health-check URL requested on start, if any
    pub ping_url: Option<String>,
    /// Bearer token for the `Authorization` header
    pub bearer_token: Option<String>,
    pub timeout: Duration,
}

impl ChannelConfig {
    /// Build the configuration of `kind` from the session's endpoint settings.
    ///
    /// Fails with [`DomainError::MissingEndpoint`] if no base URL is set.
    pub fn configure(kind: ChannelKind, settings: &EndpointSettings) -> Result<Self, DomainError> {
        let base = settings.base_url().ok_or(DomainError::MissingEndpoint)?;

        let ping_url = match kind {
            ChannelKind::Response => Some(
                settings
                    .ping_url
                    .clone()
                    .filter(|u| !u.trim().is_empty())
                    .unwrap_or_else(|| settings.compose_url(base, PING_PATH)),
            ),
            ChannelKind::Understanding => None,
        };

        Ok(Self {
            kind,
            url: settings.compose_url(base, settings.path_for(kind)),
            ping_url,
            bearer_token: settings.jwt.clone().filter(|j| !j.is_empty()),
            timeout: settings.timeout,
        })
    }

    /// Value for the `Authorization` header, if a bearer token is configured.
    pub fn authorization_header(&self) -> Option<String> {
        self.bearer_token.as_ref().map(|t| format!("Bearer {}", t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configure_response_channel() {
        let settings = EndpointSettings::new("http://localhost:5005");
        let config = ChannelConfig::configure(ChannelKind::Response, &settings).unwrap();
        assert_eq!(config.url, "http://localhost:5005/webhooks/rest/webhook");
        assert_eq!(
            config.ping_url.as_deref(),
            Some("http://localhost:5005/version")
        );
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.authorization_header().is_none());
    }

    #[test]
    fn test_configure_understanding_channel_has_no_ping() {
        let settings = EndpointSettings::new("http://localhost:5005/");
        let config = ChannelConfig::configure(ChannelKind::Understanding, &settings).unwrap();
        assert_eq!(config.url, "http://localhost:5005/model/parse");
        assert!(config.ping_url.is_none());
    }

    #[test]
    fn test_token_is_appended_as_query() {
        let settings = EndpointSettings::new("https://bot.example.com").with_token("s3cret");
        let response = ChannelConfig::configure(ChannelKind::Response, &settings).unwrap();
        assert_eq!(
            response.url,
            "https://bot.example.com/webhooks/rest/webhook?token=s3cret"
        );
        assert_eq!(
            response.ping_url.as_deref(),
            Some("https://bot.example.com/version?token=s3cret")
        );
    }

    #[test]
    fn test_jwt_becomes_bearer_header() {
        let settings = EndpointSettings::new("http://localhost:5005").with_jwt("abc.def");
        let config = ChannelConfig::configure(ChannelKind::Understanding, &settings).unwrap();
        assert_eq!(
            config.authorization_header().as_deref(),
            Some("Bearer abc.def")
        );
    }

    #[test]
    fn test_path_overrides() {
        let mut settings = EndpointSettings::new("http://localhost:5005");
        settings.rest_path = Some("/custom/webhook".into());
        settings.nlu_path = Some("nlu/parse".into());
        settings.ping_url = Some("http://health.local/ping".into());

        let response = ChannelConfig::configure(ChannelKind::Response, &settings).unwrap();
        assert_eq!(response.url, "http://localhost:5005/custom/webhook");
        assert_eq!(response.ping_url.as_deref(), Some("http://health.local/ping"));

        let understanding = ChannelConfig::configure(ChannelKind::Understanding, &settings).unwrap();
        assert_eq!(understanding.url, "http://localhost:5005/nlu/parse");
    }

    #[test]
    fn test_missing_endpoint_fails() {
        let settings = EndpointSettings::default();
        assert_eq!(
            ChannelConfig::configure(ChannelKind::Response, &settings),
            Err(DomainError::MissingEndpoint)
        );

        let blank = EndpointSettings::new("   ");
        assert_eq!(
            ChannelConfig::configure(ChannelKind::Understanding, &blank),
            Err(DomainError::MissingEndpoint)
        );
    }
}
