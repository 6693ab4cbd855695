//! Channel activation mode.
//!
//! [`Mode`] decides, once per session, which channels participate in every
//! turn. It is parsed from configuration and never changes afterwards.

use crate::channel::kind::ChannelKind;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which channels are active for a session.
///
/// Besides the canonical names, the Rasa connector capability names are
/// accepted (`DIALOG_AND_NLU`, `REST_INPUT`, `NLU_INPUT`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Dialogue engine only
    ResponseOnly,
    /// NLU engine only
    UnderstandingOnly,
    /// Both engines; replies are merged
    #[default]
    Both,
}

impl Mode {
    /// Active channels, in merge order.
    pub fn channels(&self) -> &'static [ChannelKind] {
        match self {
            Mode::ResponseOnly => &[ChannelKind::Response],
            Mode::UnderstandingOnly => &[ChannelKind::Understanding],
            Mode::Both => &ChannelKind::MERGE_ORDER,
        }
    }

    /// Whether `channel` participates in turns.
    pub fn includes(&self, channel: ChannelKind) -> bool {
        self.channels().contains(&channel)
    }

    /// Whether turn results go through the merge engine.
    pub fn is_multi_channel(&self) -> bool {
        self.channels().len() > 1
    }

    /// Get a human-readable description of this mode
    pub fn description(&self) -> &'static str {
        match self {
            Mode::ResponseOnly => "Dialogue engine only",
            Mode::UnderstandingOnly => "NLU engine only",
            Mode::Both => "Dialogue and NLU engines, merged",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::ResponseOnly => write!(f, "response_only"),
            Mode::UnderstandingOnly => write!(f, "understanding_only"),
            Mode::Both => write!(f, "both"),
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        match normalized.as_str() {
            "both" | "dialog_and_nlu" => Ok(Mode::Both),
            "response_only" | "response" | "rest_input" => Ok(Mode::ResponseOnly),
            "understanding_only" | "understanding" | "nlu_input" => Ok(Mode::UnderstandingOnly),
            _ => Err(DomainError::InvalidMode(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_both() {
        assert_eq!(Mode::default(), Mode::Both);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("both".parse::<Mode>().ok(), Some(Mode::Both));
        assert_eq!("DIALOG_AND_NLU".parse::<Mode>().ok(), Some(Mode::Both));
        assert_eq!(
            "response-only".parse::<Mode>().ok(),
            Some(Mode::ResponseOnly)
        );
        assert_eq!("REST_INPUT".parse::<Mode>().ok(), Some(Mode::ResponseOnly));
        assert_eq!(
            "understanding_only".parse::<Mode>().ok(),
            Some(Mode::UnderstandingOnly)
        );
        assert_eq!(
            "NLU_INPUT".parse::<Mode>().ok(),
            Some(Mode::UnderstandingOnly)
        );
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert_eq!(
            "chatty".parse::<Mode>(),
            Err(DomainError::InvalidMode("chatty".to_string()))
        );
        assert!("".parse::<Mode>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for mode in [Mode::ResponseOnly, Mode::UnderstandingOnly, Mode::Both] {
            assert_eq!(mode.to_string().parse::<Mode>().ok(), Some(mode));
        }
    }

    #[test]
    fn test_channels() {
        assert_eq!(Mode::ResponseOnly.channels(), &[ChannelKind::Response]);
        assert_eq!(
            Mode::UnderstandingOnly.channels(),
            &[ChannelKind::Understanding]
        );
        assert_eq!(
            Mode::Both.channels(),
            &[ChannelKind::Understanding, ChannelKind::Response]
        );
        assert!(Mode::Both.is_multi_channel());
        assert!(!Mode::ResponseOnly.is_multi_channel());
        assert!(!Mode::UnderstandingOnly.includes(ChannelKind::Response));
    }
}
