//! Session configuration from TOML (`[session]` section)

use rasa_bridge_domain::{ConfigIssue, ConfigIssueCode, Mode};
use serde::{Deserialize, Serialize};

/// Raw session configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionConfig {
    /// `both`, `response_only`, `understanding_only` (or the capability aliases)
    pub mode: Option<String>,
    /// Conversation id; generated when unset
    pub sender: Option<String>,
}

impl FileSessionConfig {
    /// Parse the mode, reporting an issue if it is not recognized.
    pub fn parse_mode(&self) -> (Option<Mode>, Vec<ConfigIssue>) {
        let Some(raw) = self.mode.as_deref().map(str::trim).filter(|m| !m.is_empty()) else {
            return (None, Vec::new());
        };
        match raw.parse::<Mode>() {
            Ok(mode) => (Some(mode), Vec::new()),
            Err(e) => (
                None,
                vec![ConfigIssue::error(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "session.mode".to_string(),
                        value: raw.to_string(),
                        valid_values: vec![
                            "both".to_string(),
                            "response_only".to_string(),
                            "understanding_only".to_string(),
                        ],
                    },
                    format!("session.mode: {}", e),
                )],
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode() {
        let config = FileSessionConfig {
            mode: Some("NLU_INPUT".to_string()),
            sender: None,
        };
        let (mode, issues) = config.parse_mode();
        assert_eq!(mode, Some(Mode::UnderstandingOnly));
        assert!(issues.is_empty());
    }

    #[test]
    fn test_parse_unknown_mode() {
        let config = FileSessionConfig {
            mode: Some("everything".to_string()),
            sender: None,
        };
        let (mode, issues) = config.parse_mode();
        assert!(mode.is_none());
        assert_eq!(issues.len(), 1);
        assert!(ConfigIssue::has_errors(&issues));
    }

    #[test]
    fn test_blank_mode_means_default() {
        let config = FileSessionConfig {
            mode: Some("  ".to_string()),
            sender: None,
        };
        let (mode, issues) = config.parse_mode();
        assert!(mode.is_none());
        assert!(issues.is_empty());
    }
}
