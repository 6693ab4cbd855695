//! Error types for the Rasa HTTP adapter

use rasa_bridge_application::TransportError;
use thiserror::Error;

/// Result type alias for Rasa operations
pub type Result<T> = std::result::Result<T, RasaError>;

/// Errors that can occur when talking to a Rasa server
#[derive(Error, Debug)]
pub enum RasaError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP {status} from {url}: {body}")]
    HttpStatus {
        status: u16,
        url: String,
        body: String,
    },

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Transport used before build")]
    NotBuilt,
}

impl From<RasaError> for TransportError {
    fn from(error: RasaError) -> Self {
        match error {
            RasaError::Http(e) if e.is_timeout() => TransportError::Timeout,
            RasaError::Http(e) if e.is_connect() => TransportError::ConnectionError(e.to_string()),
            RasaError::Http(e) => TransportError::RequestFailed(e.to_string()),
            RasaError::HttpStatus { status, body, .. } => TransportError::HttpStatus {
                status,
                message: body,
            },
            RasaError::SerializationError(e) => TransportError::InvalidResponse(e.to_string()),
            RasaError::UnexpectedResponse(msg) => TransportError::InvalidResponse(msg),
            RasaError::NotBuilt => TransportError::Other(RasaError::NotBuilt.to_string()),
        }
    }
}
