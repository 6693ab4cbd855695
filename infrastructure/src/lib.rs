//! Infrastructure layer for rasa-bridge
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the Rasa HTTP transport, configuration
//! file loading and the JSONL transcript logger.

pub mod config;
pub mod logging;
pub mod rasa;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileConfig, FileEndpointConfig, FileLoggingConfig, FileOutputConfig,
    FileSessionConfig,
};
pub use logging::JsonlConversationLogger;
pub use rasa::{
    error::{RasaError, Result},
    factory::HttpTransportFactory,
    transport::HttpChannelTransport,
};
