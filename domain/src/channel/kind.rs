//! Channel identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a backend channel.
///
/// The derived `Ord` is the merge order: `Understanding` sorts before
/// `Response`, so a colliding field ends up with the Response channel's
/// value. Do not reorder the variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// NLU engine (`model/parse`)
    Understanding,
    /// Dialogue engine (`webhooks/rest/webhook`)
    Response,
}

impl ChannelKind {
    /// All channels, in merge order.
    pub const MERGE_ORDER: [ChannelKind; 2] = [ChannelKind::Understanding, ChannelKind::Response];

    /// Default endpoint path appended to the base URL.
    pub fn default_path(&self) -> &'static str {
        match self {
            ChannelKind::Response => "webhooks/rest/webhook",
            ChannelKind::Understanding => "model/parse",
        }
    }

    /// Position of this channel in [`Self::MERGE_ORDER`].
    pub fn merge_rank(&self) -> usize {
        match self {
            ChannelKind::Understanding => 0,
            ChannelKind::Response => 1,
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelKind::Response => write!(f, "response"),
            ChannelKind::Understanding => write!(f, "understanding"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_order_puts_understanding_first() {
        assert_eq!(
            ChannelKind::MERGE_ORDER,
            [ChannelKind::Understanding, ChannelKind::Response]
        );
        assert!(ChannelKind::Understanding < ChannelKind::Response);
        for (rank, kind) in ChannelKind::MERGE_ORDER.iter().enumerate() {
            assert_eq!(kind.merge_rank(), rank);
        }
    }

    #[test]
    fn test_default_paths() {
        assert_eq!(ChannelKind::Response.default_path(), "webhooks/rest/webhook");
        assert_eq!(ChannelKind::Understanding.default_path(), "model/parse");
    }

    #[test]
    fn test_display() {
        assert_eq!(ChannelKind::Response.to_string(), "response");
        assert_eq!(ChannelKind::Understanding.to_string(), "understanding");
    }
}
