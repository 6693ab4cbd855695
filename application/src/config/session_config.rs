//! Session configuration and mode selection.
//!
//! [`SessionConfig`] is assembled by the caller (CLI flags, config file)
//! and validated exactly once, when the session starts. Nothing here
//! performs I/O.

use rasa_bridge_domain::{DomainError, EndpointSettings, Mode};
use serde::{Deserialize, Serialize};

/// Prefix of generated sender ids.
const SENDER_PREFIX: &str = "rasa-bridge";

/// Everything needed to start a [`ChatSession`](crate::use_cases::session::ChatSession).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Endpoint shared by every channel
    pub endpoint: EndpointSettings,
    /// Requested mode, parsed by [`ModeSelector::validate`]; `None` means both channels
    pub mode: Option<String>,
    /// Conversation id sent with every message
    pub sender: Option<String>,
}

impl SessionConfig {
    pub fn new(endpoint: EndpointSettings) -> Self {
        Self {
            endpoint,
            ..Default::default()
        }
    }

    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    /// The configured sender, or one generated from the current time.
    pub fn resolve_sender(&self) -> String {
        self.sender
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| {
                format!(
                    "{}-{}",
                    SENDER_PREFIX,
                    chrono::Utc::now().timestamp_millis()
                )
            })
    }
}

/// Fixes which channels take part in a session.
pub struct ModeSelector;

impl ModeSelector {
    /// Validate `config` and return its [`Mode`].
    ///
    /// Fails if the endpoint is absent or the mode string is unknown.
    /// Defaults to [`Mode::Both`].
    pub fn validate(config: &SessionConfig) -> Result<Mode, DomainError> {
        if config.endpoint.base_url().is_none() {
            return Err(DomainError::MissingEndpoint);
        }

        match config.mode.as_deref().map(str::trim) {
            Some(mode) if !mode.is_empty() => mode.parse(),
            _ => Ok(Mode::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SessionConfig {
        SessionConfig::new(EndpointSettings::new("http://localhost:5005"))
    }

    #[test]
    fn test_defaults_to_both() {
        assert_eq!(ModeSelector::validate(&config()).unwrap(), Mode::Both);
        assert_eq!(
            ModeSelector::validate(&config().with_mode("  ")).unwrap(),
            Mode::Both
        );
    }

    #[test]
    fn test_accepts_capability_aliases() {
        let cases = [
            ("DIALOG_AND_NLU", Mode::Both),
            ("rest_input", Mode::ResponseOnly),
            ("nlu-input", Mode::UnderstandingOnly),
            ("response_only", Mode::ResponseOnly),
        ];
        for (raw, expected) in cases {
            assert_eq!(
                ModeSelector::validate(&config().with_mode(raw)).unwrap(),
                expected,
                "mode {raw}"
            );
        }
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let err = ModeSelector::validate(&config().with_mode("chatty")).unwrap_err();
        assert_eq!(err, DomainError::InvalidMode("chatty".to_string()));
    }

    #[test]
    fn test_missing_endpoint_is_rejected_first() {
        let config = SessionConfig::default().with_mode("chatty");
        assert_eq!(
            ModeSelector::validate(&config).unwrap_err(),
            DomainError::MissingEndpoint
        );

        let blank = SessionConfig::new(EndpointSettings::new("   "));
        assert_eq!(
            ModeSelector::validate(&blank).unwrap_err(),
            DomainError::MissingEndpoint
        );
    }

    #[test]
    fn test_resolve_sender() {
        assert_eq!(config().with_sender("alice").resolve_sender(), "alice");
        assert!(config().resolve_sender().starts_with("rasa-bridge-"));
    }
}
