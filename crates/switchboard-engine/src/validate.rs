// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Schema validation and repair of untrusted classifier output.
//!
//! `intent` and `confidence` cannot be repaired; every other field is
//! normalized to a well-formed value. All unrepairable fields are reported
//! together in one [`SwitchboardError::Validation`].

use serde_json::Value;
use switchboard_core::{
    Intent, ProductInterest, Sentiment, SwitchboardError, Trigger, TriggerSet,
};
use tracing::warn;

use crate::adapter::ClassificationCandidate;

/// Longest reasoning kept, in characters.
pub const MAX_REASONING_CHARS: usize = 500;

/// A candidate whose every field is well-formed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedCandidate {
    pub intent: Intent,
    pub confidence: f64,
    pub product_interest: Option<ProductInterest>,
    pub sentiment: Sentiment,
    pub triggers: TriggerSet,
    /// Trigger keys the classifier actually reported, true or false.
    pub reported: TriggerSet,
    pub reasoning: String,
    /// Fields that had to be repaired, in schema order.
    pub repaired: Vec<&'static str>,
}

impl ValidatedCandidate {
    pub fn triggers_met(&self) -> usize {
        self.triggers.met()
    }
}

/// Validates `candidate`, repairing what can be repaired.
pub fn validate(candidate: &ClassificationCandidate) -> Result<ValidatedCandidate, SwitchboardError> {
    let mut failures: Vec<(&'static str, String)> = Vec::new();
    let mut repaired = Vec::new();

    let intent = match parse_intent(candidate.get("intent")) {
        Ok(intent) => Some(intent),
        Err(reason) => {
            failures.push(("intent", reason));
            None
        }
    };

    let confidence = match parse_confidence(candidate.get("confidence")) {
        Ok(confidence) => Some(confidence),
        Err(reason) => {
            failures.push(("confidence", reason));
            None
        }
    };

    let (product_interest, ok) = parse_product_interest(candidate.get("product_interest"));
    if !ok {
        repaired.push("product_interest");
    }

    let (sentiment, ok) = parse_sentiment(candidate.get("sentiment"));
    if !ok {
        repaired.push("sentiment");
    }

    let (triggers, reported, ok) = parse_triggers(candidate.get("triggers"));
    if !ok {
        repaired.push("triggers");
    }

    let (reasoning, ok) = parse_reasoning(candidate.get("reasoning"));
    if !ok {
        repaired.push("reasoning");
    }

    match (intent, confidence) {
        (Some(intent), Some(confidence)) => {
            if !repaired.is_empty() {
                warn!(fields = ?repaired, "repaired classifier output");
            }
            Ok(ValidatedCandidate {
                intent,
                confidence,
                product_interest,
                sentiment,
                triggers,
                reported,
                reasoning,
                repaired,
            })
        }
        _ => {
            let message = failures
                .iter()
                .map(|(field, reason)| format!("{field}: {reason}"))
                .collect::<Vec<_>>()
                .join("; ");
            Err(SwitchboardError::Validation {
                fields: failures.iter().map(|(f, _)| f.to_string()).collect(),
                message,
            })
        }
    }
}

fn parse_intent(value: Option<&Value>) -> Result<Intent, String> {
    match value {
        None | Some(Value::Null) => Err("missing".to_string()),
        Some(Value::String(s)) => {
            let normalized = s.split_whitespace().collect::<Vec<_>>().join("_");
            normalized
                .parse::<Intent>()
                .map_err(|_| format!("unknown intent `{s}`"))
        }
        Some(other) => Err(format!("expected a string, got {}", type_name(other))),
    }
}

fn parse_confidence(value: Option<&Value>) -> Result<f64, String> {
    let number = match value {
        None | Some(Value::Null) => return Err("missing".to_string()),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(other) => return Err(format!("expected a number, got {}", type_name(other))),
    };
    match number {
        Some(n) if !n.is_nan() => Ok(n.clamp(0.0, 1.0)),
        _ => Err("not a number".to_string()),
    }
}

/// Returns the value and whether it was well-formed as given.
fn parse_product_interest(value: Option<&Value>) -> (Option<ProductInterest>, bool) {
    match value {
        None => (None, false),
        Some(Value::Null) => (None, true),
        Some(Value::String(s)) if s.trim().eq_ignore_ascii_case("null") => (None, false),
        Some(Value::String(s)) => match s.trim().parse() {
            Ok(interest) => (Some(interest), true),
            Err(_) => (None, false),
        },
        Some(_) => (None, false),
    }
}

fn parse_sentiment(value: Option<&Value>) -> (Sentiment, bool) {
    match value.and_then(Value::as_str).map(|s| s.trim().parse()) {
        Some(Ok(sentiment)) => (sentiment, true),
        _ => (Sentiment::default(), false),
    }
}

/// Returns the triggers, which keys were present, and well-formedness.
fn parse_triggers(value: Option<&Value>) -> (TriggerSet, TriggerSet, bool) {
    let Some(Value::Object(map)) = value else {
        return (TriggerSet::default(), TriggerSet::default(), false);
    };
    let reported = TriggerSet::from_fn(|trigger| {
        map.get(trigger.key()).is_some_and(|v| !v.is_null())
    });
    let mut well_formed = map.len() == Trigger::all().count();
    let triggers = TriggerSet::from_fn(|trigger| match map.get(trigger.key()) {
        Some(Value::Bool(b)) => *b,
        Some(other) => {
            well_formed = false;
            truthy(other)
        }
        None => {
            well_formed = false;
            false
        }
    });
    (triggers, reported, well_formed)
}

fn parse_reasoning(value: Option<&Value>) -> (String, bool) {
    let Some(Value::String(s)) = value else {
        return (String::new(), false);
    };
    let trimmed = s.trim();
    let capped: String = trimmed.chars().take(MAX_REASONING_CHARS).collect();
    let well_formed = capped.len() == s.len();
    (capped.trim_end().to_string(), well_formed)
}

/// Truthiness for non-boolean trigger values.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => {
            let s = s.trim().to_ascii_lowercase();
            match s.as_str() {
                "true" | "yes" | "y" | "1" | "on" => true,
                "false" | "no" | "n" | "0" | "off" | "" | "null" => false,
                _ => true,
            }
        }
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
