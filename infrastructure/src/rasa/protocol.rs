//! Rasa HTTP wire format
//!
//! Two endpoints are used:
//!
//! - `webhooks/rest/webhook` (Response channel): request
//!   `{"message", "sender"}`, response is an array of bot messages. Every
//!   element becomes one push.
//! - `model/parse` (Understanding channel): request `{"text"}`, response is a
//!   single parse result that becomes one push carrying an [`NlpAnnotation`].
//!
//! Fields that do not have the expected shape are skipped; the raw element
//! is always kept as the reply's source data.

use super::error::{RasaError, Result};
use rasa_bridge_domain::{
    BotReply, Button, EntityAnnotation, IntentAnnotation, NlpAnnotation, RankedIntent,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Intent name the NLU engine uses for "nothing recognized".
const NONE_INTENT: &str = "none";

/// Body of a REST webhook request
#[derive(Debug, Serialize)]
pub struct RestRequest<'a> {
    pub message: &'a str,
    pub sender: &'a str,
}

/// Body of an NLU parse request
#[derive(Debug, Serialize)]
pub struct ParseRequest<'a> {
    pub text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ParseResult {
    intent: Option<ParsedIntent>,
    // `null` is accepted for both lists
    intent_ranking: Option<Vec<ParsedIntent>>,
    entities: Option<Vec<ParsedEntity>>,
}

#[derive(Debug, Deserialize)]
struct ParsedIntent {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    confidence: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ParsedEntity {
    entity: String,
    #[serde(default)]
    value: Value,
    #[serde(default)]
    confidence: Option<f64>,
}

/// Convert a REST webhook response body into one reply per message.
///
/// An empty body or `null` yields no replies.
pub fn rest_replies(body: Value) -> Result<Vec<BotReply>> {
    let elements = match body {
        Value::Array(elements) => elements,
        Value::Null => return Ok(Vec::new()),
        other => {
            return Err(RasaError::UnexpectedResponse(format!(
                "expected a JSON array of messages, got {}",
                kind_of(&other)
            )));
        }
    };

    Ok(elements.into_iter().map(rest_reply).collect())
}

/// Map one bot message field by field: a field of the wrong type is skipped
/// without affecting the others.
fn rest_reply(element: Value) -> BotReply {
    let mut reply = BotReply::new();
    if let Some(text) = element.get("text").and_then(Value::as_str) {
        reply = reply.with_text(text);
    }
    if let Some(image) = element
        .get("image")
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
    {
        reply = reply.with_media(image);
    }
    if let Some(items) = element.get("buttons").and_then(Value::as_array) {
        let buttons: Vec<Button> = items.iter().filter_map(rest_button).collect();
        if buttons.len() < items.len() {
            debug!(
                "Skipped {} malformed button(s) of bot message",
                items.len() - buttons.len()
            );
        }
        if !buttons.is_empty() {
            reply = reply.with_buttons(buttons);
        }
    }
    reply.with_source_data(element)
}

/// `{title, payload}`; a button without a string title is dropped.
fn rest_button(item: &Value) -> Option<Button> {
    let title = item.get("title")?.as_str()?;
    Some(Button {
        text: title.to_string(),
        payload: item
            .get("payload")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

/// Convert an NLU parse result into a reply carrying the annotation.
pub fn parse_reply(body: Value) -> BotReply {
    let result: ParseResult = serde_json::from_value(body.clone()).unwrap_or_else(|e| {
        debug!("Skipping malformed fields of parse result: {}", e);
        ParseResult::default()
    });

    let mut intent = match result.intent {
        Some(ParsedIntent {
            name: Some(name),
            confidence,
        }) if !name.eq_ignore_ascii_case(NONE_INTENT) && !name.is_empty() => IntentAnnotation {
            name: Some(name),
            confidence,
            ..Default::default()
        },
        Some(ParsedIntent { name, confidence }) => IntentAnnotation {
            name,
            confidence,
            incomprehension: true,
            ..Default::default()
        },
        None => IntentAnnotation::incomprehension(),
    };

    intent = intent.with_ranking(
        result
            .intent_ranking
            .unwrap_or_default()
            .into_iter()
            .filter_map(|i| {
                Some(RankedIntent {
                    name: i.name?,
                    confidence: i.confidence.unwrap_or_default(),
                })
            })
            .collect(),
    );

    let entities = result
        .entities
        .unwrap_or_default()
        .into_iter()
        .map(|e| EntityAnnotation {
            name: e.entity,
            value: e.value,
            confidence: e.confidence,
        })
        .collect();

    BotReply::new()
        .with_nlp(NlpAnnotation::new(intent).with_entities(entities))
        .with_source_data(body)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
