//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod endpoint;
mod logging;
mod session;

pub use endpoint::FileEndpointConfig;
pub use logging::FileLoggingConfig;
pub use session::FileSessionConfig;

use rasa_bridge_application::SessionConfig;
use rasa_bridge_domain::{ConfigIssue, ConfigIssueCode, OutputFormat};
use serde::{Deserialize, Serialize};

/// `[output]`: how deliveries are printed.
///
/// `format` stays unset unless configured so that `--output` and the text
/// default can be told apart when printing `--show-config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    pub format: Option<OutputFormat>,
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Rasa server endpoint
    pub endpoint: FileEndpointConfig,
    /// Mode and sender
    pub session: FileSessionConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Transcript settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// A missing endpoint is not reported here: it may still come from
    /// the command line. Session start rejects it.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.session.parse_mode().1);

        if self.endpoint.timeout_seconds == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroTimeout,
                "endpoint.timeout_seconds cannot be 0",
            ));
        }

        if self.endpoint.token.is_some() && self.endpoint.jwt.is_some() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::DuplicateAuth,
                "endpoint.token and endpoint.jwt are both set; both will be sent",
            ));
        }

        issues
    }

    /// Session configuration described by this file.
    pub fn to_session_config(&self) -> SessionConfig {
        SessionConfig {
            endpoint: self.endpoint.to_settings(),
            mode: self.session.mode.clone(),
            sender: self.session.sender.clone(),
        }
    }
}
