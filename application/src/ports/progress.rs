//! Progress notification port
//!
//! Defines the interface for reporting progress while a turn runs.

use rasa_bridge_domain::{ChannelKind, TurnPhase};

/// Callback for progress updates during a turn
///
/// Implementations live in the presentation layer (spinner, plain log, ...).
pub trait TurnProgressNotifier: Send + Sync {
    /// Called when the turn enters a phase
    fn on_phase(&self, phase: TurnPhase, channels: &[ChannelKind]);

    /// Called when a channel's correlated reply resolves
    fn on_channel_reply(&self, channel: ChannelKind, success: bool);

    /// Called once the turn has returned to idle or failed
    fn on_turn_complete(&self, _success: bool) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl TurnProgressNotifier for NoProgress {
    fn on_phase(&self, _phase: TurnPhase, _channels: &[ChannelKind]) {}
    fn on_channel_reply(&self, _channel: ChannelKind, _success: bool) {}
}
