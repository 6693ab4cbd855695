//! Understanding annotation carried by NLU replies.

use serde::{Deserialize, Serialize};

/// Structured NLU result attached to a reply.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NlpAnnotation {
    pub intent: IntentAnnotation,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entities: Vec<EntityAnnotation>,
}

impl NlpAnnotation {
    pub fn new(intent: IntentAnnotation) -> Self {
        Self {
            intent,
            entities: Vec::new(),
        }
    }

    pub fn with_entities(mut self, entities: Vec<EntityAnnotation>) -> Self {
        self.entities = entities;
        self
    }
}

/// Top intent plus the ranked alternatives.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IntentAnnotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Set when the engine did not recognize any meaningful intent
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub incomprehension: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub intents: Vec<RankedIntent>,
}

impl IntentAnnotation {
    /// A recognized intent.
    pub fn named(name: impl Into<String>, confidence: f64) -> Self {
        Self {
            name: Some(name.into()),
            confidence: Some(confidence),
            ..Default::default()
        }
    }

    /// No intent recognized.
    pub fn incomprehension() -> Self {
        Self {
            incomprehension: true,
            ..Default::default()
        }
    }

    pub fn with_ranking(mut self, intents: Vec<RankedIntent>) -> Self {
        self.intents = intents;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedIntent {
    pub name: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityAnnotation {
    pub name: String,
    pub value: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_named_intent_serializes_compactly() {
        let nlp = NlpAnnotation::new(IntentAnnotation::named("book_flight", 0.92));
        assert_eq!(
            serde_json::to_value(&nlp).unwrap(),
            json!({"intent": {"name": "book_flight", "confidence": 0.92}})
        );
    }

    #[test]
    fn test_incomprehension_serializes_flag() {
        let nlp = NlpAnnotation::new(IntentAnnotation::incomprehension());
        assert_eq!(
            serde_json::to_value(&nlp).unwrap(),
            json!({"intent": {"incomprehension": true}})
        );
    }
}
