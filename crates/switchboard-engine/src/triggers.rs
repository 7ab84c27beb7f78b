// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Expansion trigger evaluation from message text.
//!
//! Each trigger has supporting and contrary cues. A contrary cue forces the
//! trigger false, otherwise a supporting cue forces it true, otherwise the
//! deployment's default assumption applies. No network, no latency.

use switchboard_core::{Message, Trigger, TriggerDefaults, TriggerSet};

use crate::cues::{self, CueText};

/// Supporting and contrary cues for one trigger.
struct Evidence {
    supporting: &'static [&'static [&'static str]],
    contrary: &'static [&'static [&'static str]],
}

fn evidence(trigger: Trigger) -> Evidence {
    match trigger {
        Trigger::NotOnPremium => Evidence {
            supporting: &[cues::NOT_PREMIUM],
            contrary: &[cues::ALREADY_PREMIUM],
        },
        Trigger::OnboardingCompleted => Evidence {
            supporting: &[cues::ONBOARDING_COMPLETE],
            contrary: &[cues::ONBOARDING_INCOMPLETE],
        },
        Trigger::NoActiveIncidents => Evidence {
            supporting: &[],
            contrary: &[cues::INCIDENT],
        },
        Trigger::HighEngagement => Evidence {
            supporting: &[cues::HIGH_ENGAGEMENT],
            contrary: &[cues::LOW_ENGAGEMENT],
        },
        Trigger::GoodStanding => Evidence {
            supporting: &[],
            contrary: &[cues::BAD_STANDING],
        },
        Trigger::FeatureDiscoveryAttempts => Evidence {
            supporting: &[cues::VIDEO_CALLS, cues::ANALYTICS, cues::PREMIUM_SUITE],
            contrary: &[],
        },
        Trigger::PositiveSentiment => Evidence {
            supporting: &[cues::POSITIVE],
            contrary: &[cues::NEGATIVE],
        },
        Trigger::UsageVelocityPositive => Evidence {
            supporting: &[cues::USAGE_GROWTH],
            contrary: &[],
        },
        Trigger::MultiUserGrowth => Evidence {
            supporting: &[cues::TEAM_GROWTH],
            contrary: &[],
        },
        Trigger::ContractRenewalSoon => Evidence {
            supporting: &[cues::RENEWAL_SOON],
            contrary: &[cues::RECENTLY_RENEWED],
        },
    }
}

/// Computes the ten expansion triggers for a message.
#[derive(Debug, Clone, Copy, Default)]
pub struct TriggerEvaluator {
    defaults: TriggerDefaults,
}

impl TriggerEvaluator {
    pub fn new(defaults: TriggerDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &TriggerDefaults {
        &self.defaults
    }

    /// Evaluates every trigger against `message`. Never fails.
    pub fn evaluate(&self, message: &Message) -> TriggerSet {
        self.evaluate_text(message.as_str())
    }

    pub(crate) fn evaluate_text(&self, text: &str) -> TriggerSet {
        let text = CueText::new(text);
        TriggerSet::from_fn(|trigger| {
            let Evidence {
                supporting,
                contrary,
            } = evidence(trigger);
            if contrary.iter().any(|list| text.first(list).is_some()) {
                false
            } else if supporting.iter().any(|list| text.first(list).is_some()) {
                true
            } else {
                self.defaults.default_for(trigger).unwrap_or(false)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluate(text: &str) -> TriggerSet {
        TriggerEvaluator::default().evaluate(&Message::new(text).unwrap())
    }

    #[test]
    fn plain_message_yields_policy_baseline() {
        let triggers = evaluate("Hello, quick question about invoices.");
        assert_eq!(triggers, TriggerDefaults::default().baseline());
        assert_eq!(triggers.met(), 5);
    }

    #[test]
    fn video_calls_count_as_feature_discovery() {
        let triggers = evaluate("I want to use video calls for my clinic with 5 doctors");
        assert!(triggers.feature_discovery_attempts);
        assert!(triggers.no_active_incidents);
        assert!(!triggers.multi_user_growth);
    }

    #[test]
    fn analytics_counts_as_feature_discovery() {
        assert!(evaluate("Our enterprise account (50 seats) wants analytics access").feature_discovery_attempts);
    }

    #[test]
    fn calendar_bug_is_an_incident_not_a_discovery() {
        let triggers = evaluate("The calendar sync is broken");
        assert!(!triggers.no_active_incidents);
        assert!(!triggers.feature_discovery_attempts);
    }

    #[test]
    fn contrary_cue_beats_supporting_cue() {
        let triggers = evaluate("Honestly not happy, it was great before");
        assert!(!triggers.positive_sentiment);

        let triggers = evaluate("We just renewed our contract");
        assert!(!triggers.contract_renewal_soon);
    }

    #[test]
    fn supporting_cue_overrides_false_default() {
        let triggers = evaluate("Our contract expires next month, can we talk about renewal?");
        assert!(triggers.contract_renewal_soon);
    }

    #[test]
    fn contrary_cue_overrides_true_default() {
        let triggers = evaluate("Our card declined and the account is suspended");
        assert!(!triggers.good_standing);

        let triggers = evaluate("We are on premium already");
        assert!(!triggers.not_on_premium);

        let triggers = evaluate("We just signed up and are still onboarding");
        assert!(!triggers.onboarding_completed);
    }

    #[test]
    fn growth_cues_set_evidence_triggers() {
        let triggers = evaluate("We're growing fast and hired a new doctor, thanks!");
        assert!(triggers.usage_velocity_positive);
        assert!(triggers.multi_user_growth);
        assert!(triggers.positive_sentiment);
    }

    #[test]
    fn deployment_defaults_are_honored() {
        let defaults = TriggerDefaults {
            not_on_premium: false,
            contract_renewal_soon: true,
            ..TriggerDefaults::default()
        };
        let evaluator = TriggerEvaluator::new(defaults);
        let triggers = evaluator.evaluate(&Message::new("Hello there").unwrap());
        assert!(!triggers.not_on_premium);
        assert!(triggers.contract_renewal_soon);
        assert_eq!(triggers, defaults.baseline());
    }
}
