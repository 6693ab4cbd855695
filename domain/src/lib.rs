//! Domain layer for rasa-bridge
//!
//! This crate contains the core concepts of a test turn against a
//! conversational backend. It has no dependencies on infrastructure or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! ## Channels
//!
//! A session talks to up to two independent backends:
//!
//! - **Response**: the dialogue engine, answers with text and buttons
//! - **Understanding**: the NLU engine, answers with an intent/entity annotation
//!
//! ## Mode
//!
//! [`Mode`] fixes which channels take part in every turn of a session.
//!
//! ## Merge
//!
//! When both channels are active their replies are folded into one
//! [`CombinedResponse`] by [`merge`], always in the same channel order.

pub mod channel;
pub mod config;
pub mod core;
pub mod orchestration;
pub mod reply;
pub mod util;

// Re-export commonly used types
pub use channel::{
    config::{ChannelConfig, DEFAULT_TIMEOUT, EndpointSettings},
    kind::ChannelKind,
    lifecycle::LifecycleState,
};
pub use config::OutputFormat;
pub use config::validation::{ConfigIssue, ConfigIssueCode, Severity};
pub use core::error::DomainError;
pub use orchestration::{
    merge::merge,
    mode::Mode,
    turn::TurnPhase,
    value_objects::{ChannelReply, CombinedResponse, Delivery},
};
pub use reply::{
    entities::{BotReply, Button, OutboundMessage},
    nlp::{EntityAnnotation, IntentAnnotation, NlpAnnotation, RankedIntent},
};
