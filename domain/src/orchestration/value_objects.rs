//! Orchestration value objects - per-channel replies and what a turn emits.
//!
//! - [`ChannelReply`] - a reply tagged with the channel that pushed it
//! - [`CombinedResponse`] - the merged result of a multi-channel turn
//! - [`Delivery`] - one item handed to the caller's reply sink

use crate::channel::kind::ChannelKind;
use crate::reply::entities::{BotReply, Button};
use crate::reply::nlp::NlpAnnotation;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A reply correlated to the channel that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelReply {
    pub channel: ChannelKind,
    pub reply: BotReply,
}

impl ChannelReply {
    pub fn new(channel: ChannelKind, reply: BotReply) -> Self {
        Self { channel, reply }
    }
}

/// Merged reply of a turn with more than one active channel.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CombinedResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<Button>,
    /// Raw payloads of every participating reply, in merge order
    #[serde(default)]
    pub source_data: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nlp: Option<NlpAnnotation>,
}

/// One item emitted to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Delivery {
    /// Result of a single-channel turn, verbatim
    Reply { channel: ChannelKind, reply: BotReply },
    /// Result of a multi-channel turn
    Combined(CombinedResponse),
    /// A buffered push replayed after the turn result
    Spillover { channel: ChannelKind, reply: BotReply },
}

impl Delivery {
    pub fn text(&self) -> Option<&str> {
        match self {
            Delivery::Reply { reply, .. } | Delivery::Spillover { reply, .. } => {
                reply.text.as_deref()
            }
            Delivery::Combined(combined) => combined.text.as_deref(),
        }
    }

    pub fn buttons(&self) -> &[Button] {
        match self {
            Delivery::Reply { reply, .. } | Delivery::Spillover { reply, .. } => &reply.buttons,
            Delivery::Combined(combined) => &combined.buttons,
        }
    }

    pub fn nlp(&self) -> Option<&NlpAnnotation> {
        match self {
            Delivery::Reply { reply, .. } | Delivery::Spillover { reply, .. } => reply.nlp.as_ref(),
            Delivery::Combined(combined) => combined.nlp.as_ref(),
        }
    }

    /// Whether this delivery is a replayed spillover push.
    pub fn is_spillover(&self) -> bool {
        matches!(self, Delivery::Spillover { .. })
    }

    /// Whether this delivery is the result of a turn.
    pub fn is_turn_result(&self) -> bool {
        !self.is_spillover()
    }
}
