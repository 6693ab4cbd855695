//! Channel lifecycle states.

use crate::channel::kind::ChannelKind;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a channel adapter.
///
/// `Created → Validated → Built → Started → Stopped → Released`.
/// `Stopped` and `Released` are reachable from every earlier state so a
/// session can always be torn down, even if setup failed half way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    #[default]
    Created,
    Validated,
    Built,
    Started,
    Stopped,
    Released,
}

impl LifecycleState {
    /// Whether `self → next` is a legal transition.
    pub fn can_transition_to(&self, next: LifecycleState) -> bool {
        use LifecycleState::*;
        matches!(
            (self, next),
            (Created, Validated)
                | (Validated, Built)
                | (Built, Started)
                | (Created | Validated | Built | Started, Stopped)
                | (Created | Validated | Built | Started | Stopped, Released)
        )
    }

    /// Perform a transition, returning the new state.
    pub fn transition(
        self,
        channel: ChannelKind,
        next: LifecycleState,
    ) -> Result<LifecycleState, DomainError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(DomainError::InvalidTransition {
                channel,
                from: self,
                to: next,
            })
        }
    }

    /// Whether the channel accepts `send`.
    pub fn is_started(&self) -> bool {
        matches!(self, LifecycleState::Started)
    }

    /// Whether the channel has been stopped or released.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LifecycleState::Stopped | LifecycleState::Released)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Created => "created",
            LifecycleState::Validated => "validated",
            LifecycleState::Built => "built",
            LifecycleState::Started => "started",
            LifecycleState::Stopped => "stopped",
            LifecycleState::Released => "released",
        };
        write!(f, "{}", name)
    }
}
