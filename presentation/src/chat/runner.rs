//! Runs turns with a caller-side time bound

use crate::progress::reporter::{ProgressReporter, SimpleProgress};
use rasa_bridge_application::{ChatSession, NoProgress, TurnError, TurnReport};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Why a turn produced no result
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Turn(#[from] TurnError),

    #[error("No reply within {}s", .0.as_secs_f32())]
    TimedOut(Duration),
}

/// How a runner reports turn progress on stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    Hidden,
    /// Animated spinner, for terminals
    Spinner,
    /// One line per event, for redirected stderr
    Lines,
}

/// Sends turns on a session, giving up after `wait`.
///
/// A channel that never pushes keeps its turn waiting; bounding the wait is
/// left to the caller. Replies that arrive after giving up are printed as
/// extras with the next turn.
pub struct TurnRunner {
    session: Arc<ChatSession>,
    wait: Duration,
    progress: ProgressMode,
}

impl TurnRunner {
    pub fn new(session: Arc<ChatSession>, wait: Duration) -> Self {
        Self {
            session,
            wait,
            progress: ProgressMode::Spinner,
        }
    }

    pub fn with_progress(mut self, progress: ProgressMode) -> Self {
        self.progress = progress;
        self
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub async fn run(&self, text: &str) -> Result<TurnReport, RunError> {
        let turn = async {
            match self.progress {
                ProgressMode::Spinner => {
                    let progress = ProgressReporter::new();
                    self.session.send_turn_with_progress(text, &progress).await
                }
                ProgressMode::Lines => {
                    self.session
                        .send_turn_with_progress(text, &SimpleProgress)
                        .await
                }
                ProgressMode::Hidden => self.session.send_turn_with_progress(text, &NoProgress).await,
            }
        };

        match tokio::time::timeout(self.wait, turn).await {
            Ok(result) => Ok(result?),
            Err(_) => {
                warn!("Turn gave up after {:?}", self.wait);
                Err(RunError::TimedOut(self.wait))
            }
        }
    }
}
