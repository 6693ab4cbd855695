//! Outbound and inbound message entities.

use crate::reply::nlp::NlpAnnotation;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A user turn as sent to the channels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// The user's utterance
    pub text: String,
    /// Conversation identifier the backend keys its tracker on
    pub sender: String,
}

impl OutboundMessage {
    pub fn new(text: impl Into<String>, sender: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: sender.into(),
        }
    }
}

/// An interactive choice offered by the bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

impl Button {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }
}

/// One inbound push from a channel.
///
/// Every field is optional: a channel that says nothing about a field simply
/// leaves it empty, and the merge rule then leaves the combined value alone.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BotReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<Button>,
    /// Media attachment URLs (images)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<String>,
    /// Raw payload as received from the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nlp: Option<NlpAnnotation>,
}

impl BotReply {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::default().with_text(text)
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_buttons(mut self, buttons: Vec<Button>) -> Self {
        self.buttons = buttons;
        self
    }

    pub fn with_media(mut self, url: impl Into<String>) -> Self {
        self.media.push(url.into());
        self
    }

    pub fn with_source_data(mut self, source_data: Value) -> Self {
        self.source_data = Some(source_data);
        self
    }

    pub fn with_nlp(mut self, nlp: NlpAnnotation) -> Self {
        self.nlp = Some(nlp);
        self
    }

    /// Text, if present and non-empty.
    pub fn non_empty_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }
}
