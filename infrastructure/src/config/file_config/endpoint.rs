//! Endpoint configuration from TOML (`[endpoint]` section)

use rasa_bridge_domain::{DEFAULT_TIMEOUT, EndpointSettings};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw endpoint configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEndpointConfig {
    /// Base URL of the Rasa server
    pub url: Option<String>,
    /// Query token (`?token=`)
    pub token: Option<String>,
    /// JWT for the `Authorization: Bearer` header
    pub jwt: Option<String>,
    /// Health-check URL used when the Response channel starts
    pub ping_url: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Override for `webhooks/rest/webhook`
    pub rest_path: Option<String>,
    /// Override for `model/parse`
    pub nlu_path: Option<String>,
}

impl Default for FileEndpointConfig {
    fn default() -> Self {
        Self {
            url: None,
            token: None,
            jwt: None,
            ping_url: None,
            timeout_seconds: DEFAULT_TIMEOUT.as_secs(),
            rest_path: None,
            nlu_path: None,
        }
    }
}

impl FileEndpointConfig {
    pub fn to_settings(&self) -> EndpointSettings {
        EndpointSettings {
            url: self.url.clone(),
            token: self.token.clone(),
            jwt: self.jwt.clone(),
            ping_url: self.ping_url.clone(),
            rest_path: self.rest_path.clone(),
            nlu_path: self.nlu_path.clone(),
            timeout: Duration::from_secs(self.timeout_seconds),
        }
    }
}
