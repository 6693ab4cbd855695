//! Per-channel response correlation.
//!
//! A [`ResponseCorrelator`] pairs the *next* push of a channel with the
//! turn currently waiting on it. Pushes that arrive while nothing waits are
//! kept in a FIFO spillover queue and replayed after the turn result.
//!
//! ```text
//! register() ──► Awaiting(tx) ──push──► tx.send(reply) ──► Buffering
//!                     │                                       │
//!                     └──fail(err)──► tx.send(Err) ───────────┘
//! Buffering ──push──► spillover.push_back(reply)
//! Detached  ──push──► dropped (warn)
//! ```

use crate::ports::channel_transport::TransportError;
use crate::use_cases::send_turn::TurnError;
use rasa_bridge_domain::{BotReply, ChannelKind, DomainError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::oneshot;
use tracing::{debug, trace, warn};

type Completion = Result<BotReply, TransportError>;

/// Explicit correlator state.
#[derive(Debug)]
enum CorrelatorState {
    /// Channel not started, or stopped: pushes are dropped
    Detached,
    /// Started, nothing waiting: pushes go to spillover
    Buffering,
    /// A turn waits for the next push
    Awaiting(oneshot::Sender<Completion>),
}

#[derive(Debug)]
struct Inner {
    state: CorrelatorState,
    spillover: VecDeque<BotReply>,
}

/// What happened to an inbound push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// Resolved the pending correlation
    Resolved,
    /// Appended to the spillover queue
    Buffered,
    /// Channel detached, push discarded
    Dropped,
}

/// Correlates pushes of one channel to the turn waiting on it.
#[derive(Debug)]
pub struct ResponseCorrelator {
    channel: ChannelKind,
    inner: Mutex<Inner>,
}

impl ResponseCorrelator {
    pub fn new(channel: ChannelKind) -> Arc<Self> {
        Arc::new(Self {
            channel,
            inner: Mutex::new(Inner {
                state: CorrelatorState::Detached,
                spillover: VecDeque::new(),
            }),
        })
    }

    pub fn channel(&self) -> ChannelKind {
        self.channel
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Start accepting pushes.
    pub fn attach(&self) {
        let mut inner = self.lock();
        if matches!(inner.state, CorrelatorState::Detached) {
            inner.state = CorrelatorState::Buffering;
        }
    }

    /// Stop accepting pushes.
    ///
    /// A pending correlation is dropped (its waiter sees the turn abandoned)
    /// and buffered pushes are discarded.
    pub fn detach(&self) {
        let mut inner = self.lock();
        inner.state = CorrelatorState::Detached;
        let discarded = inner.spillover.len();
        inner.spillover.clear();
        if discarded > 0 {
            debug!(
                "Discarded {} spillover push(es) on {} channel",
                discarded, self.channel
            );
        }
    }

    /// Register interest in the next push.
    ///
    /// Rejected while another correlation is outstanding. A correlation
    /// whose waiter went away counts as absent.
    pub fn register(&self) -> Result<PendingCorrelation, DomainError> {
        let mut inner = self.lock();
        match &inner.state {
            CorrelatorState::Detached => return Err(DomainError::ChannelNotStarted(self.channel)),
            CorrelatorState::Awaiting(tx) if !tx.is_closed() => {
                return Err(DomainError::CorrelationPending(self.channel));
            }
            _ => {}
        }

        let (tx, rx) = oneshot::channel();
        inner.state = CorrelatorState::Awaiting(tx);
        trace!("Registered correlation on {} channel", self.channel);

        Ok(PendingCorrelation {
            channel: self.channel,
            rx,
        })
    }

    /// Handle an inbound push.
    pub fn on_push(&self, reply: BotReply) -> PushOutcome {
        let mut inner = self.lock();
        match std::mem::replace(&mut inner.state, CorrelatorState::Buffering) {
            CorrelatorState::Detached => {
                inner.state = CorrelatorState::Detached;
                warn!("Dropping push on detached {} channel", self.channel);
                PushOutcome::Dropped
            }
            CorrelatorState::Awaiting(tx) => match tx.send(Ok(reply)) {
                Ok(()) => {
                    trace!("Push resolved correlation on {} channel", self.channel);
                    PushOutcome::Resolved
                }
                Err(unsent) => {
                    // Waiter gone: the turn was abandoned
                    if let Ok(reply) = unsent {
                        inner.spillover.push_back(reply);
                    }
                    debug!(
                        "Correlation on {} channel was abandoned, push buffered",
                        self.channel
                    );
                    PushOutcome::Buffered
                }
            },
            CorrelatorState::Buffering => {
                inner.spillover.push_back(reply);
                debug!(
                    "Buffered spillover push on {} channel ({} queued)",
                    self.channel,
                    inner.spillover.len()
                );
                PushOutcome::Buffered
            }
        }
    }

    /// Resolve the pending correlation with a dispatch failure.
    ///
    /// Returns `false` if nothing was waiting.
    pub fn fail(&self, error: TransportError) -> bool {
        let mut inner = self.lock();
        match std::mem::replace(&mut inner.state, CorrelatorState::Buffering) {
            CorrelatorState::Awaiting(tx) => {
                if tx.send(Err(error)).is_ok() {
                    return true;
                }
                warn!(
                    "Dispatch failure on {} channel after its turn was abandoned",
                    self.channel
                );
                false
            }
            other => {
                inner.state = other;
                warn!(
                    "Dispatch failure on {} channel with no pending correlation: {}",
                    self.channel, error
                );
                false
            }
        }
    }

    /// Drop a pending correlation, if any, keeping the channel attached.
    pub fn reset(&self) {
        let mut inner = self.lock();
        if matches!(inner.state, CorrelatorState::Awaiting(_)) {
            inner.state = CorrelatorState::Buffering;
            trace!("Reset pending correlation on {} channel", self.channel);
        }
    }

    /// Take every buffered push, oldest first.
    pub fn drain_spillover(&self) -> Vec<BotReply> {
        self.lock().spillover.drain(..).collect()
    }

    pub fn spillover_len(&self) -> usize {
        self.lock().spillover.len()
    }

    /// Whether a live correlation is outstanding.
    pub fn is_awaiting(&self) -> bool {
        matches!(&self.lock().state, CorrelatorState::Awaiting(tx) if !tx.is_closed())
    }

    pub fn is_attached(&self) -> bool {
        !matches!(self.lock().state, CorrelatorState::Detached)
    }
}

/// A single-fire wait for the next push of one channel.
#[derive(Debug)]
pub struct PendingCorrelation {
    channel: ChannelKind,
    rx: oneshot::Receiver<Completion>,
}

impl PendingCorrelation {
    pub fn channel(&self) -> ChannelKind {
        self.channel
    }

    /// Wait for the correlated reply.
    pub async fn wait(self) -> Result<BotReply, TurnError> {
        match self.rx.await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(source)) => Err(TurnError::ChannelFailed {
                channel: self.channel,
                source,
            }),
            Err(_) => Err(TurnError::Abandoned(self.channel)),
        }
    }
}

/// Push-subscription point handed to a transport.
#[derive(Debug, Clone)]
pub struct PushSink {
    correlator: Arc<ResponseCorrelator>,
}

impl PushSink {
    pub fn new(correlator: Arc<ResponseCorrelator>) -> Self {
        Self { correlator }
    }

    pub fn channel(&self) -> ChannelKind {
        self.correlator.channel()
    }

    /// Deliver one inbound message.
    pub fn push(&self, reply: BotReply) -> PushOutcome {
        self.correlator.on_push(reply)
    }
}
