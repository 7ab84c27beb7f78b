// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Offline keyword classifier.
//!
//! Scores each intent by the cues it matches and answers with a JSON payload
//! shaped like the policy's output schema. No network, no latency. Useful
//! when no model is configured and as a deterministic stand-in for tests.

use async_trait::async_trait;
use serde_json::json;
use switchboard_core::{
    ClassifierProvider, HealthStatus, Intent, PluginAdapter, PolicySpec, ProductInterest,
    Sentiment, SwitchboardError, TRIGGERS_TOTAL,
};

use crate::cues::{self, CueText};
use crate::triggers::TriggerEvaluator;

/// Result of scoring one message.
#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicVerdict {
    pub intent: Intent,
    pub confidence: f64,
    pub product_interest: Option<ProductInterest>,
    pub sentiment: Sentiment,
    /// Cues that decided the intent.
    pub matched: Vec<&'static str>,
}

/// Rule-based [`ClassifierProvider`].
#[derive(Debug, Clone, Default)]
pub struct HeuristicProvider;

impl HeuristicProvider {
    pub fn new() -> Self {
        Self
    }

    /// Scores `text` without rendering a payload.
    pub fn score(&self, text: &str) -> HeuristicVerdict {
        let text = CueText::new(text);

        let product_interest = product_interest(&text);

        // Listed in tie-break order; the sort is stable.
        let mut ranked = vec![
            (Intent::Expansion, premium_cues(&text)),
            (Intent::Bug, text.all(cues::INCIDENT)),
            (Intent::Reonboarding, text.all(cues::REONBOARDING)),
            (Intent::Training, text.all(cues::HOW_TO)),
        ];
        ranked.sort_by(|a, b| b.1.len().cmp(&a.1.len()));

        let runner_up = ranked.get(1).map_or(0, |(_, matched)| matched.len());
        let (intent, matched) = ranked
            .into_iter()
            .next()
            .filter(|(_, matched)| !matched.is_empty())
            .unwrap_or((Intent::General, Vec::new()));

        HeuristicVerdict {
            intent,
            confidence: score_to_confidence(matched.len(), runner_up),
            product_interest,
            sentiment: sentiment(&text),
            matched,
        }
    }
}

fn premium_cues(text: &CueText) -> Vec<&'static str> {
    [cues::VIDEO_CALLS, cues::ANALYTICS, cues::PREMIUM_SUITE]
        .iter()
        .flat_map(|list| text.all(list))
        .collect()
}

fn product_interest(text: &CueText) -> Option<ProductInterest> {
    if text.first(cues::VIDEO_CALLS).is_some() {
        Some(ProductInterest::VideoCalls)
    } else if text.first(cues::ANALYTICS).is_some() {
        Some(ProductInterest::Analytics)
    } else if text.first(cues::PREMIUM_SUITE).is_some() {
        Some(ProductInterest::PremiumSuite)
    } else {
        None
    }
}

fn sentiment(text: &CueText) -> Sentiment {
    if text.first(cues::ANGRY).is_some() {
        Sentiment::Angry
    } else if text.first(cues::FRUSTRATED).is_some() {
        Sentiment::Frustrated
    } else if text.first(cues::POSITIVE).is_some() {
        Sentiment::Positive
    } else {
        Sentiment::Neutral
    }
}

/// Margin over the runner-up buys confidence; no cues at all is a coin flip.
fn score_to_confidence(top: usize, runner_up: usize) -> f64 {
    if top == 0 {
        return 0.5;
    }
    let margin = top.saturating_sub(runner_up) as f64;
    (0.55 + 0.15 * margin).min(0.95)
}

#[async_trait]
impl PluginAdapter for HeuristicProvider {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, SwitchboardError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ClassifierProvider for HeuristicProvider {
    async fn predict(&self, text: &str, policy: &PolicySpec) -> Result<String, SwitchboardError> {
        let verdict = self.score(text);
        let triggers = TriggerEvaluator::new(*policy.defaults()).evaluate_text(text);

        let reasoning = if verdict.matched.is_empty() {
            "No intent-specific keywords found.".to_string()
        } else {
            format!(
                "Keyword match for {}: {}.",
                verdict.intent,
                verdict.matched.join(", ")
            )
        };

        let payload = json!({
            "intent": verdict.intent,
            "confidence": verdict.confidence,
            "product_interest": verdict.product_interest,
            "sentiment": verdict.sentiment,
            "triggers": triggers,
            "triggers_met": triggers.met(),
            "triggers_total": TRIGGERS_TOTAL,
            "reasoning": reasoning,
        });
        Ok(payload.to_string())
    }
}
