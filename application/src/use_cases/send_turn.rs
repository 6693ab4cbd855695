//! Send Turn use case
//!
//! Fans one outbound message out to every active channel, waits for each
//! channel's correlated reply, merges them and emits a single result,
//! then replays any spillover pushes.

use crate::channel::ChannelHandle;
use crate::correlation::ResponseCorrelator;
use crate::ports::channel_transport::TransportError;
use crate::ports::conversation_logger::{
    events, ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::progress::{NoProgress, TurnProgressNotifier};
use crate::ports::reply_sink::ReplySink;
use futures::future::try_join_all;
use rasa_bridge_domain::util::preview;
use rasa_bridge_domain::{
    merge, ChannelKind, ChannelReply, CombinedResponse, Delivery, DomainError, Mode,
    OutboundMessage, TurnPhase,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

type Dispatch = JoinHandle<Result<(), TransportError>>;

/// Errors that can occur during a turn
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TurnError {
    #[error("Another turn is already in progress on this session")]
    TurnInProgress,

    #[error("{channel} channel failed: {source}")]
    ChannelFailed {
        channel: ChannelKind,
        source: TransportError,
    },

    #[error("Turn was abandoned while waiting on the {0} channel")]
    Abandoned(ChannelKind),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Summary of a completed turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    pub mode: Mode,
    pub channels: Vec<ChannelKind>,
    /// Number of spillover deliveries replayed after the result
    pub spillover: usize,
}

/// Ephemeral per-turn state.
///
/// Dropping it resets every correlator it touched, so a turn that ends
/// early (failure, cancellation) never leaves a live correlation behind.
struct TurnState {
    phase: TurnPhase,
    multi_channel: bool,
    channels: Vec<ChannelKind>,
    correlators: Vec<Arc<ResponseCorrelator>>,
}

impl TurnState {
    fn new(mode: Mode, channels: &[Arc<ChannelHandle>]) -> Self {
        Self {
            phase: TurnPhase::Idle,
            multi_channel: mode.is_multi_channel(),
            channels: channels.iter().map(|c| c.kind()).collect(),
            correlators: channels.iter().map(|c| Arc::clone(c.correlator())).collect(),
        }
    }

    fn advance(&mut self, progress: &dyn TurnProgressNotifier) {
        self.phase = self.phase.next(self.multi_channel);
        debug!("Turn phase: {}", self.phase);
        progress.on_phase(self.phase, &self.channels);
    }
}

impl Drop for TurnState {
    fn drop(&mut self) {
        for correlator in &self.correlators {
            correlator.reset();
        }
    }
}

/// Runs turns against a fixed set of started channels.
///
/// Turns never overlap: a second call while one is running fails with
/// [`TurnError::TurnInProgress`]. Dispatches left running by a failed or
/// cancelled turn are awaited before the next turn registers, so their late
/// pushes land in spillover instead of resolving the wrong turn.
pub struct TurnOrchestrator {
    mode: Mode,
    channels: Vec<Arc<ChannelHandle>>,
    sink: Arc<dyn ReplySink>,
    logger: Arc<dyn ConversationLogger>,
    turn_guard: Mutex<Vec<Dispatch>>,
}

impl TurnOrchestrator {
    pub fn new(mode: Mode, channels: Vec<Arc<ChannelHandle>>, sink: Arc<dyn ReplySink>) -> Self {
        Self {
            mode,
            channels,
            sink,
            logger: Arc::new(NoConversationLogger),
            turn_guard: Mutex::new(Vec::new()),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Execute one turn with default (no-op) progress
    pub async fn execute(&self, message: OutboundMessage) -> Result<TurnReport, TurnError> {
        self.execute_with_progress(message, &NoProgress).await
    }

    /// Execute one turn with progress callbacks
    pub async fn execute_with_progress(
        &self,
        message: OutboundMessage,
        progress: &dyn TurnProgressNotifier,
    ) -> Result<TurnReport, TurnError> {
        let mut in_flight = self
            .turn_guard
            .try_lock()
            .map_err(|_| TurnError::TurnInProgress)?;
        Self::settle(&mut in_flight).await;

        let result = self.run(message, progress, &mut in_flight).await;
        progress.on_turn_complete(result.is_ok());
        result
    }

    async fn run(
        &self,
        message: OutboundMessage,
        progress: &dyn TurnProgressNotifier,
        in_flight: &mut Vec<Dispatch>,
    ) -> Result<TurnReport, TurnError> {
        if let Some(channel) = self.channels.iter().find(|c| !c.state().is_started()) {
            return Err(DomainError::ChannelNotStarted(channel.kind()).into());
        }

        let mut turn = TurnState::new(self.mode, &self.channels);
        info!(
            "Turn in {} mode: \"{}\"",
            self.mode,
            preview(&message.text, 60)
        );

        // Dispatching: register before sending so the first push can't race past us
        turn.advance(progress);
        let mut pending = Vec::with_capacity(self.channels.len());
        for channel in &self.channels {
            pending.push(channel.correlator().register()?);
        }
        // Tracked under the turn guard at once, so a turn dropped mid-way
        // still leaves its sends for the next turn to settle
        in_flight.extend(self.channels.iter().map(|c| c.dispatch(message.clone())));
        self.logger.log(ConversationEvent::new(
            events::TURN_DISPATCHED,
            json!({
                "mode": self.mode.to_string(),
                "sender": message.sender,
                "text": message.text,
                "channels": turn.channels,
            }),
        ));

        // Collecting
        turn.advance(progress);
        let waits = pending.into_iter().map(|correlation| async move {
            let channel = correlation.channel();
            let result = correlation.wait().await;
            progress.on_channel_reply(channel, result.is_ok());
            result.map(|reply| ChannelReply::new(channel, reply))
        });
        let mut replies = match try_join_all(waits).await {
            Ok(replies) => replies,
            Err(e) => {
                warn!("Turn failed: {}", e);
                self.logger.log(ConversationEvent::new(
                    events::TURN_FAILED,
                    json!({ "error": e.to_string() }),
                ));
                return Err(e);
            }
        };
        for reply in &replies {
            self.logger.log(ConversationEvent::new(
                events::CHANNEL_REPLY,
                json!({ "channel": reply.channel, "reply": reply.reply }),
            ));
        }

        // Merging (multi-channel only), then Emitting
        turn.advance(progress);
        let delivery = if turn.multi_channel {
            let combined = merge(&replies);
            turn.advance(progress);
            Delivery::Combined(combined)
        } else {
            match replies.pop() {
                Some(ChannelReply { channel, reply }) => Delivery::Reply { channel, reply },
                None => Delivery::Combined(CombinedResponse::default()),
            }
        };
        self.logger.log(ConversationEvent::new(
            events::TURN_EMITTED,
            json!({ "delivery": delivery }),
        ));
        self.sink.deliver(delivery);

        // FlushingSpillover: every push caused by this send has landed once
        // its dispatch completed
        turn.advance(progress);
        Self::settle(in_flight).await;
        let mut spillover = 0;
        for channel in &self.channels {
            let drained = channel.correlator().drain_spillover();
            if drained.is_empty() {
                continue;
            }
            debug!(
                "Flushing {} spillover push(es) from {} channel",
                drained.len(),
                channel.kind()
            );
            self.logger.log(ConversationEvent::new(
                events::SPILLOVER_FLUSHED,
                json!({ "channel": channel.kind(), "count": drained.len() }),
            ));
            for reply in drained {
                self.sink.deliver(Delivery::Spillover {
                    channel: channel.kind(),
                    reply,
                });
                spillover += 1;
            }
        }

        turn.advance(progress);
        Ok(TurnReport {
            mode: self.mode,
            channels: turn.channels.clone(),
            spillover,
        })
    }

    /// Wait for every tracked dispatch, including those of a turn that
    /// failed or was dropped before it could flush.
    async fn settle(in_flight: &mut Vec<Dispatch>) {
        if in_flight.is_empty() {
            return;
        }
        debug!("Settling {} in-flight dispatch(es)", in_flight.len());
        // Removed only once joined: dropping this future keeps the rest tracked
        while let Some(dispatch) = in_flight.last_mut() {
            Self::join_dispatch(dispatch).await;
            in_flight.pop();
        }
    }

    async fn join_dispatch(dispatch: &mut Dispatch) {
        match dispatch.await {
            Ok(Ok(())) => {}
            // Already reported through the correlator
            Ok(Err(e)) => debug!("Dispatch completed with error: {}", e),
            Err(e) => warn!("Dispatch task join error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::reply_sink::ChannelReplySink;
    use crate::test_support::{started_channel, Script};
    use rasa_bridge_domain::{BotReply, Button, IntentAnnotation, NlpAnnotation};
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn orchestrator(
        mode: Mode,
        channels: Vec<Arc<ChannelHandle>>,
    ) -> (TurnOrchestrator, mpsc::UnboundedReceiver<Delivery>) {
        let (sink, rx) = ChannelReplySink::new();
        (TurnOrchestrator::new(mode, channels, Arc::new(sink)), rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<Delivery>) -> Vec<Delivery> {
        let mut deliveries = Vec::new();
        while let Ok(delivery) = rx.try_recv() {
            deliveries.push(delivery);
        }
        deliveries
    }

    fn message(text: &str) -> OutboundMessage {
        OutboundMessage::new(text, "tester")
    }

    fn flight_intent() -> BotReply {
        BotReply::new()
            .with_nlp(NlpAnnotation::new(IntentAnnotation::named("book_flight", 0.93)))
            .with_source_data(json!({"intent": {"name": "book_flight"}}))
    }

    fn flight_answer() -> BotReply {
        BotReply::text("Where to?")
            .with_buttons(vec![Button::new("Paris").with_payload("/paris")])
            .with_source_data(json!([{"text": "Where to?"}]))
    }

    #[tokio::test]
    async fn test_single_channel_reply_is_verbatim() {
        let reply = BotReply::text("hi")
            .with_buttons(vec![Button::new("ok")])
            .with_media("http://img/1.png");
        let channel = started_channel(ChannelKind::Response, Script::reply(reply.clone())).await;
        let (orchestrator, mut rx) = orchestrator(Mode::ResponseOnly, vec![channel]);

        let report = orchestrator.execute(message("hello")).await.unwrap();
        assert_eq!(report.channels, vec![ChannelKind::Response]);
        assert_eq!(report.spillover, 0);

        assert_eq!(
            drain(&mut rx),
            vec![Delivery::Reply {
                channel: ChannelKind::Response,
                reply,
            }]
        );
    }

    #[tokio::test]
    async fn test_book_a_flight_scenario() {
        let understanding =
            started_channel(ChannelKind::Understanding, Script::reply(flight_intent())).await;
        let response = started_channel(ChannelKind::Response, Script::reply(flight_answer())).await;
        let (orchestrator, mut rx) = orchestrator(Mode::Both, vec![understanding, response]);

        orchestrator.execute(message("book a flight")).await.unwrap();

        let deliveries = drain(&mut rx);
        assert_eq!(deliveries.len(), 1);
        let Delivery::Combined(combined) = &deliveries[0] else {
            panic!("expected combined delivery, got {:?}", deliveries[0]);
        };
        assert_eq!(combined.text.as_deref(), Some("Where to?"));
        assert_eq!(combined.buttons.len(), 1);
        assert_eq!(
            combined.nlp.as_ref().and_then(|n| n.intent.name.as_deref()),
            Some("book_flight")
        );
        assert_eq!(
            combined.source_data,
            vec![
                json!({"intent": {"name": "book_flight"}}),
                json!({"text": "Where to?"}),
            ]
        );
    }

    #[tokio::test]
    async fn test_combined_result_is_independent_of_arrival_order() {
        let mut results = Vec::new();
        for (understanding_delay, response_delay) in [(5, 40), (40, 5)] {
            let understanding = started_channel(
                ChannelKind::Understanding,
                Script::reply(flight_intent().with_text("nlu text"))
                    .delayed(Duration::from_millis(understanding_delay)),
            )
            .await;
            let response = started_channel(
                ChannelKind::Response,
                Script::reply(flight_answer()).delayed(Duration::from_millis(response_delay)),
            )
            .await;
            let (orchestrator, mut rx) = orchestrator(Mode::Both, vec![understanding, response]);
            orchestrator.execute(message("book a flight")).await.unwrap();
            results.push(drain(&mut rx));
        }

        assert_eq!(results[0], results[1]);
        // Response comes last in merge order, so its text wins
        assert_eq!(results[0][0].text(), Some("Where to?"));
    }

    #[tokio::test]
    async fn test_extra_pushes_are_replayed_after_result() {
        let response = started_channel(
            ChannelKind::Response,
            Script::replies(vec![
                BotReply::text("first"),
                BotReply::text("second"),
                BotReply::text("third"),
            ]),
        )
        .await;
        let understanding =
            started_channel(ChannelKind::Understanding, Script::reply(flight_intent())).await;
        let (orchestrator, mut rx) = orchestrator(Mode::Both, vec![understanding, response]);

        let report = orchestrator.execute(message("hi")).await.unwrap();
        assert_eq!(report.spillover, 2);

        let deliveries = drain(&mut rx);
        assert_eq!(deliveries.len(), 3);
        assert!(deliveries[0].is_turn_result());
        assert_eq!(deliveries[0].text(), Some("first"));
        assert_eq!(
            deliveries[1..]
                .iter()
                .map(|d| (d.is_spillover(), d.text()))
                .collect::<Vec<_>>(),
            vec![(true, Some("second")), (true, Some("third"))]
        );
    }

    #[tokio::test]
    async fn test_partial_failure_fails_whole_turn() {
        let understanding = started_channel(
            ChannelKind::Understanding,
            Script::failing(TransportError::HttpStatus {
                status: 500,
                message: "boom".to_string(),
            }),
        )
        .await;
        let response = started_channel(
            ChannelKind::Response,
            Script::reply(flight_answer()).delayed(Duration::from_millis(300)),
        )
        .await;
        let (orchestrator, mut rx) = orchestrator(Mode::Both, vec![understanding, response]);

        let started = std::time::Instant::now();
        let err = orchestrator.execute(message("hi")).await.unwrap_err();
        assert!(started.elapsed() < Duration::from_millis(300));
        assert!(matches!(
            err,
            TurnError::ChannelFailed {
                channel: ChannelKind::Understanding,
                ..
            }
        ));
        // No partial combined response
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn test_late_push_of_failed_turn_is_flushed_next_turn() {
        let understanding = started_channel(
            ChannelKind::Understanding,
            Script::reply(flight_intent()).fail_first(1, TransportError::Timeout),
        )
        .await;
        let response = started_channel(
            ChannelKind::Response,
            Script::reply(BotReply::text("answer")).delayed(Duration::from_millis(50)),
        )
        .await;
        let (orchestrator, mut rx) = orchestrator(Mode::Both, vec![understanding, response]);

        assert!(orchestrator.execute(message("one")).await.is_err());
        let report = orchestrator.execute(message("two")).await.unwrap();
        assert_eq!(report.spillover, 1);

        let deliveries = drain(&mut rx);
        assert_eq!(deliveries.len(), 2);
        assert!(deliveries[0].is_turn_result());
        assert!(deliveries[1].is_spillover());
        assert_eq!(deliveries[1].text(), Some("answer"));
    }

    #[tokio::test]
    async fn test_zero_pushes_keeps_turn_waiting() {
        let response = started_channel(ChannelKind::Response, Script::silent()).await;
        let (orchestrator, mut rx) = orchestrator(Mode::ResponseOnly, vec![response]);

        let outcome =
            tokio::time::timeout(Duration::from_millis(50), orchestrator.execute(message("hi")))
                .await;
        assert!(outcome.is_err());
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn test_overlapping_turn_is_rejected() {
        let response = started_channel(ChannelKind::Response, Script::silent()).await;
        let (orchestrator, _rx) = orchestrator(Mode::ResponseOnly, vec![response]);
        let orchestrator = Arc::new(orchestrator);

        let first = {
            let orchestrator = Arc::clone(&orchestrator);
            tokio::spawn(async move { orchestrator.execute(message("first")).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        let err = orchestrator.execute(message("second")).await.unwrap_err();
        assert_eq!(err, TurnError::TurnInProgress);
        first.abort();
    }

    #[tokio::test]
    async fn test_stop_mid_turn_abandons_turn() {
        let response = started_channel(ChannelKind::Response, Script::silent()).await;
        let (orchestrator, _rx) = orchestrator(Mode::ResponseOnly, vec![Arc::clone(&response)]);
        let orchestrator = Arc::new(orchestrator);

        let turn = {
            let orchestrator = Arc::clone(&orchestrator);
            tokio::spawn(async move { orchestrator.execute(message("hi")).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        response.stop().await.unwrap();

        let result = turn.await.unwrap();
        assert_eq!(result, Err(TurnError::Abandoned(ChannelKind::Response)));

        // The stopped channel refuses new turns
        assert_eq!(
            orchestrator.execute(message("again")).await.unwrap_err(),
            TurnError::Domain(DomainError::ChannelNotStarted(ChannelKind::Response))
        );
    }

    #[tokio::test]
    async fn test_reply_of_cancelled_turn_is_not_taken_by_next_turn() {
        let response = started_channel(
            ChannelKind::Response,
            Script::echo().delayed(Duration::from_millis(60)),
        )
        .await;
        let (orchestrator, mut rx) = orchestrator(Mode::ResponseOnly, vec![response]);

        let cancelled =
            tokio::time::timeout(Duration::from_millis(20), orchestrator.execute(message("one")))
                .await;
        assert!(cancelled.is_err());

        let report = orchestrator.execute(message("two")).await.unwrap();
        assert_eq!(report.spillover, 1);

        let deliveries = drain(&mut rx);
        assert_eq!(
            deliveries
                .iter()
                .map(|d| (d.is_turn_result(), d.text()))
                .collect::<Vec<_>>(),
            vec![(true, Some("reply to two")), (false, Some("reply to one"))]
        );
    }

    #[tokio::test]
    async fn test_cancelled_turn_releases_correlation() {
        let response = started_channel(ChannelKind::Response, Script::silent()).await;
        let (orchestrator, _rx) = orchestrator(Mode::ResponseOnly, vec![Arc::clone(&response)]);

        let _ = tokio::time::timeout(Duration::from_millis(20), orchestrator.execute(message("hi")))
            .await;
        assert!(!response.correlator().is_awaiting());
    }
}
