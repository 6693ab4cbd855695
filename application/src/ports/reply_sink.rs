//! Reply sink port
//!
//! Where a session hands its [`Delivery`] items: one turn result per turn,
//! followed by any replayed spillover pushes.

use rasa_bridge_domain::Delivery;
use tokio::sync::mpsc;

/// Receives everything a session emits.
///
/// `deliver` is synchronous and infallible so that a slow or broken
/// consumer cannot stall the turn in the middle of its emit phase.
pub trait ReplySink: Send + Sync {
    fn deliver(&self, delivery: Delivery);
}

/// Forwards deliveries into an unbounded `mpsc` channel.
pub struct ChannelReplySink {
    tx: mpsc::UnboundedSender<Delivery>,
}

impl ChannelReplySink {
    /// Create a sink and the receiver that observes it.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Delivery>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ReplySink for ChannelReplySink {
    fn deliver(&self, delivery: Delivery) {
        // Receiver gone means nobody is listening anymore
        let _ = self.tx.send(delivery);
    }
}
