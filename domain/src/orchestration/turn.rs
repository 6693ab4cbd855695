//! Turn state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of a turn.
///
/// `Idle → Dispatching → Collecting → Merging → Emitting → FlushingSpillover → Idle`.
/// `Merging` is skipped when only one channel is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    #[default]
    Idle,
    Dispatching,
    Collecting,
    Merging,
    Emitting,
    FlushingSpillover,
}

impl TurnPhase {
    /// The phase that follows `self`.
    pub fn next(self, multi_channel: bool) -> TurnPhase {
        match self {
            TurnPhase::Idle => TurnPhase::Dispatching,
            TurnPhase::Dispatching => TurnPhase::Collecting,
            TurnPhase::Collecting if multi_channel => TurnPhase::Merging,
            TurnPhase::Collecting => TurnPhase::Emitting,
            TurnPhase::Merging => TurnPhase::Emitting,
            TurnPhase::Emitting => TurnPhase::FlushingSpillover,
            TurnPhase::FlushingSpillover => TurnPhase::Idle,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TurnPhase::Idle => "idle",
            TurnPhase::Dispatching => "dispatching",
            TurnPhase::Collecting => "collecting",
            TurnPhase::Merging => "merging",
            TurnPhase::Emitting => "emitting",
            TurnPhase::FlushingSpillover => "flushing_spillover",
        }
    }
}

impl fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(multi_channel: bool) -> Vec<TurnPhase> {
        let mut phases = vec![TurnPhase::Idle];
        loop {
            let next = phases.last().copied().unwrap_or_default().next(multi_channel);
            phases.push(next);
            if next == TurnPhase::Idle {
                return phases;
            }
        }
    }

    #[test]
    fn test_multi_channel_cycle() {
        assert_eq!(
            walk(true),
            vec![
                TurnPhase::Idle,
                TurnPhase::Dispatching,
                TurnPhase::Collecting,
                TurnPhase::Merging,
                TurnPhase::Emitting,
                TurnPhase::FlushingSpillover,
                TurnPhase::Idle,
            ]
        );
    }

    #[test]
    fn test_single_channel_skips_merging() {
        assert!(!walk(false).contains(&TurnPhase::Merging));
    }
}
