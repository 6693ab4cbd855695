//! Scripted transports shared by the use-case tests.

use crate::channel::ChannelHandle;
use crate::correlation::{PushSink, ResponseCorrelator};
use crate::ports::channel_transport::{ChannelTransport, TransportError, TransportFactory};
use async_trait::async_trait;
use rasa_bridge_domain::{BotReply, ChannelConfig, ChannelKind, EndpointSettings, OutboundMessage};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How a scripted transport answers every send.
#[derive(Debug, Clone, Default)]
pub struct Script {
    pub replies: Vec<BotReply>,
    pub delay: Duration,
    pub error: Option<TransportError>,
    /// Fail only the first `n` sends, if set
    pub failures: Option<usize>,
    pub start_error: Option<TransportError>,
    pub stop_error: Option<TransportError>,
    /// Push `reply to <text>` for every send, after `replies`
    pub echo: bool,
}

impl Script {
    pub fn reply(reply: BotReply) -> Self {
        Self::replies(vec![reply])
    }

    pub fn replies(replies: Vec<BotReply>) -> Self {
        Self {
            replies,
            ..Default::default()
        }
    }

    pub fn echo() -> Self {
        Self {
            echo: true,
            ..Default::default()
        }
    }

    pub fn silent() -> Self {
        Self::default()
    }

    pub fn failing(error: TransportError) -> Self {
        Self {
            error: Some(error),
            ..Default::default()
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn fail_first(mut self, n: usize, error: TransportError) -> Self {
        self.error = Some(error);
        self.failures = Some(n);
        self
    }

    pub fn failing_start(mut self, error: TransportError) -> Self {
        self.start_error = Some(error);
        self
    }

    pub fn failing_stop(mut self, error: TransportError) -> Self {
        self.stop_error = Some(error);
        self
    }
}

pub struct ScriptedTransport {
    kind: ChannelKind,
    script: Script,
    pushes: PushSink,
    sends: AtomicUsize,
    pub sent: Mutex<Vec<OutboundMessage>>,
    pub lifecycle: Mutex<Vec<&'static str>>,
}

impl ScriptedTransport {
    pub fn new(kind: ChannelKind, script: Script, pushes: PushSink) -> Self {
        Self {
            kind,
            script,
            pushes,
            sends: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
            lifecycle: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, step: &'static str) {
        self.lifecycle.lock().unwrap().push(step);
    }
}

#[async_trait]
impl ChannelTransport for ScriptedTransport {
    fn kind(&self) -> ChannelKind {
        self.kind
    }

    async fn build(&self) -> Result<(), TransportError> {
        self.record("build");
        Ok(())
    }

    async fn start(&self) -> Result<(), TransportError> {
        self.record("start");
        match &self.script.start_error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    async fn send(&self, message: &OutboundMessage) -> Result<(), TransportError> {
        self.sent.lock().unwrap().push(message.clone());
        let attempt = self.sends.fetch_add(1, Ordering::SeqCst);
        if !self.script.delay.is_zero() {
            tokio::time::sleep(self.script.delay).await;
        }

        if let Some(error) = &self.script.error {
            let fails = self.script.failures.is_none_or(|n| attempt < n);
            if fails {
                return Err(error.clone());
            }
        }

        for reply in &self.script.replies {
            self.pushes.push(reply.clone());
        }
        if self.script.echo {
            self.pushes
                .push(BotReply::text(format!("reply to {}", message.text)));
        }
        Ok(())
    }

    async fn stop(&self) -> Result<(), TransportError> {
        self.record("stop");
        match &self.script.stop_error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    async fn release(&self) -> Result<(), TransportError> {
        self.record("release");
        Ok(())
    }
}

/// A started channel handle backed by a scripted transport.
pub async fn started_channel(kind: ChannelKind, script: Script) -> Arc<ChannelHandle> {
    let config =
        ChannelConfig::configure(kind, &EndpointSettings::new("http://localhost:5005")).unwrap();
    let correlator = ResponseCorrelator::new(kind);
    let transport = ScriptedTransport::new(kind, script, PushSink::new(Arc::clone(&correlator)));
    let handle = ChannelHandle::new(config, Arc::new(transport), correlator);
    handle.validate().unwrap();
    handle.build().await.unwrap();
    handle.start().await.unwrap();
    Arc::new(handle)
}

/// Factory that hands out scripted transports and remembers them.
#[derive(Default)]
pub struct ScriptedFactory {
    pub scripts: Vec<(ChannelKind, Script)>,
    pub created: Mutex<Vec<Arc<ScriptedTransport>>>,
    pub fail_create: Option<ChannelKind>,
}

impl ScriptedFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: ChannelKind, script: Script) -> Self {
        self.scripts.push((kind, script));
        self
    }

    pub fn created_count(&self) -> usize {
        self.created.lock().unwrap().len()
    }

    pub fn transport(&self, kind: ChannelKind) -> Arc<ScriptedTransport> {
        self.created
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.kind == kind)
            .cloned()
            .unwrap()
    }
}

impl TransportFactory for ScriptedFactory {
    fn create(
        &self,
        config: ChannelConfig,
        pushes: PushSink,
    ) -> Result<Arc<dyn ChannelTransport>, TransportError> {
        if self.fail_create == Some(config.kind) {
            return Err(TransportError::Other("cannot create".to_string()));
        }
        let script = self
            .scripts
            .iter()
            .find(|(kind, _)| *kind == config.kind)
            .map(|(_, script)| script.clone())
            .unwrap_or_default();
        let transport = Arc::new(ScriptedTransport::new(config.kind, script, pushes));
        self.created.lock().unwrap().push(Arc::clone(&transport));
        Ok(transport)
    }
}
