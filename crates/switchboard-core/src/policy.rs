// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Frozen classification policy handed to every provider.
//!
//! [`TriggerDefaults`] holds the default assumptions a deployment makes about
//! its customers. [`PolicySpec`] renders those assumptions, the taxonomy and
//! the output schema into the contract a classification capability must
//! follow. Both are built once at startup and shared read-only.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use strum::IntoEnumIterator;

use crate::types::{Intent, ProductInterest, RecommendedAction, Sentiment, Trigger, TriggerSet};

/// Default assumptions applied when a message carries no contrary evidence.
///
/// Only the six triggers that represent account state carry a default; the
/// remaining four are always evidence-driven and start out false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TriggerDefaults {
    #[serde(default = "default_true")]
    pub not_on_premium: bool,
    #[serde(default = "default_true")]
    pub onboarding_completed: bool,
    #[serde(default = "default_true")]
    pub no_active_incidents: bool,
    #[serde(default = "default_true")]
    pub high_engagement: bool,
    #[serde(default = "default_true")]
    pub good_standing: bool,
    #[serde(default)]
    pub contract_renewal_soon: bool,
}

impl Default for TriggerDefaults {
    fn default() -> Self {
        Self {
            not_on_premium: true,
            onboarding_completed: true,
            no_active_incidents: true,
            high_engagement: true,
            good_standing: true,
            contract_renewal_soon: false,
        }
    }
}

fn default_true() -> bool {
    true
}

impl TriggerDefaults {
    /// The policy default for `trigger`; `None` for evidence-only triggers.
    pub fn default_for(&self, trigger: Trigger) -> Option<bool> {
        match trigger {
            Trigger::NotOnPremium => Some(self.not_on_premium),
            Trigger::OnboardingCompleted => Some(self.onboarding_completed),
            Trigger::NoActiveIncidents => Some(self.no_active_incidents),
            Trigger::HighEngagement => Some(self.high_engagement),
            Trigger::GoodStanding => Some(self.good_standing),
            Trigger::ContractRenewalSoon => Some(self.contract_renewal_soon),
            Trigger::FeatureDiscoveryAttempts
            | Trigger::PositiveSentiment
            | Trigger::UsageVelocityPositive
            | Trigger::MultiUserGrowth => None,
        }
    }

    /// Baseline trigger set before any evidence is considered.
    pub fn baseline(&self) -> TriggerSet {
        TriggerSet::from_fn(|t| self.default_for(t).unwrap_or(false))
    }
}

/// The contract sent to a classification capability with every message.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicySpec {
    defaults: TriggerDefaults,
    enterprise_seat_threshold: u32,
    system_prompt: String,
    output_schema: Value,
}

impl PolicySpec {
    pub fn new(defaults: TriggerDefaults, enterprise_seat_threshold: u32) -> Self {
        let output_schema = output_schema();
        let system_prompt = render_prompt(&defaults, enterprise_seat_threshold, &output_schema);
        Self {
            defaults,
            enterprise_seat_threshold,
            system_prompt,
            output_schema,
        }
    }

    pub fn defaults(&self) -> &TriggerDefaults {
        &self.defaults
    }

    pub fn enterprise_seat_threshold(&self) -> u32 {
        self.enterprise_seat_threshold
    }

    /// Instructions for model-backed capabilities.
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Example-shaped description of the expected JSON object.
    pub fn output_schema(&self) -> &Value {
        &self.output_schema
    }

    pub fn intents(&self) -> impl Iterator<Item = Intent> {
        Intent::iter()
    }

    pub fn trigger_names(&self) -> impl Iterator<Item = &'static str> {
        Trigger::all().map(Trigger::key)
    }
}

impl Default for PolicySpec {
    fn default() -> Self {
        Self::new(TriggerDefaults::default(), 20)
    }
}

fn joined<T: std::fmt::Display>(items: impl Iterator<Item = T>, sep: &str) -> String {
    items.map(|i| i.to_string()).collect::<Vec<_>>().join(sep)
}

fn output_schema() -> Value {
    let triggers: serde_json::Map<String, Value> = Trigger::all()
        .map(|t| (t.key().to_string(), json!("true|false")))
        .collect();
    json!({
        "intent": joined(Intent::iter(), "|"),
        "confidence": "0.00-1.00",
        "product_interest": format!("{}|null", joined(ProductInterest::iter(), "|")),
        "sentiment": joined(Sentiment::iter(), "|"),
        "triggers": triggers,
        "triggers_met": "number of true triggers",
        "triggers_total": 10,
        "recommended_action": joined(RecommendedAction::iter(), "|"),
        "reasoning": "one or two sentences"
    })
}

fn render_prompt(defaults: &TriggerDefaults, threshold: u32, schema: &Value) -> String {
    let assumption = |trigger: Trigger| match defaults.default_for(trigger) {
        Some(true) => " (assume true unless the message says otherwise)",
        Some(false) => " (assume false unless the message says otherwise)",
        None => " (true only with evidence in the message)",
    };
    let triggers = Trigger::all()
        .map(|t| format!("- {}{}", t.key(), assumption(t)))
        .collect::<Vec<_>>()
        .join("\n");
    let premium_note = if defaults.not_on_premium {
        "Unless stated otherwise, the customer is NOT on the Premium plan and has no \
         access to Premium features. Any attempt to use a Premium feature is an \
         expansion opportunity."
    } else {
        "Unless stated otherwise, the customer is already on the Premium plan."
    };
    let schema = serde_json::to_string_pretty(schema).unwrap_or_else(|_| schema.to_string());

    format!(
        "You classify inbound support messages for a healthcare practice-management \
SaaS product.\n\
\n\
For every message: pick one intent, evaluate the expansion triggers, and describe \
the product interest and sentiment.\n\
\n\
{premium_note}\n\
\n\
INTENTS: {intents}\n\
\n\
PRECEDENCE: if the message involves accessing or using a Premium feature (video \
calls, telemedicine, analytics, the premium suite) the intent is \"expansion\". \
This overrides bug, training and general.\n\
\n\
EXPANSION TRIGGERS:\n\
{triggers}\n\
\n\
ACCOUNT SIZE: clinics with fewer than {threshold} seats are small; {threshold} or \
more seats is enterprise.\n\
\n\
Return ONLY one JSON object, no markdown and no surrounding text, shaped like:\n\
{schema}\n",
        intents = joined(Intent::iter(), ", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_matches_policy_defaults() {
        let baseline = TriggerDefaults::default().baseline();
        assert!(baseline.not_on_premium);
        assert!(baseline.onboarding_completed);
        assert!(baseline.no_active_incidents);
        assert!(baseline.high_engagement);
        assert!(baseline.good_standing);
        assert!(!baseline.feature_discovery_attempts);
        assert!(!baseline.positive_sentiment);
        assert!(!baseline.usage_velocity_positive);
        assert!(!baseline.multi_user_growth);
        assert!(!baseline.contract_renewal_soon);
        assert_eq!(baseline.met(), 5);
    }

    #[test]
    fn evidence_triggers_have_no_default() {
        let defaults = TriggerDefaults::default();
        assert_eq!(defaults.default_for(Trigger::PositiveSentiment), None);
        assert_eq!(defaults.default_for(Trigger::ContractRenewalSoon), Some(false));
    }

    #[test]
    fn prompt_lists_taxonomy_and_every_trigger() {
        let spec = PolicySpec::default();
        let prompt = spec.system_prompt();
        for intent in spec.intents() {
            assert!(prompt.contains(&intent.to_string()), "missing intent {intent}");
        }
        for name in spec.trigger_names() {
            assert!(prompt.contains(name), "missing trigger {name}");
        }
        assert!(prompt.contains("fewer than 20 seats"));
    }

    #[test]
    fn prompt_reflects_tenant_defaults() {
        let defaults = TriggerDefaults {
            not_on_premium: false,
            ..TriggerDefaults::default()
        };
        let spec = PolicySpec::new(defaults, 50);
        assert!(spec.system_prompt().contains("already on the Premium plan"));
        assert!(spec.system_prompt().contains("fewer than 50 seats"));
    }

    #[test]
    fn schema_names_all_ten_triggers() {
        let spec = PolicySpec::default();
        let triggers = spec.output_schema()["triggers"].as_object().unwrap();
        assert_eq!(triggers.len(), crate::types::TRIGGERS_TOTAL);
    }
}
