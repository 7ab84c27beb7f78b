// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Precedence override and default-action rules.
//!
//! Pure functions: the same validated candidate, evaluated triggers and
//! org size always resolve to the same intent and action.

use switchboard_core::{Intent, OrgSize, ProductInterest, RecommendedAction, TriggerDefaults, TriggerSet};

use crate::validate::ValidatedCandidate;

/// Final intent, action and triggers for one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub intent: Intent,
    /// Intent the classifier proposed, before the precedence override.
    pub classified_intent: Intent,
    pub recommended_action: RecommendedAction,
    pub triggers: TriggerSet,
    pub org_size: OrgSize,
}

impl Resolution {
    pub fn overridden(&self) -> bool {
        self.intent != self.classified_intent
    }
}

/// Merges evaluator and classifier triggers.
///
/// A trigger that defaults to true stays true only while neither side has
/// contrary evidence; a key the classifier left out does not count against
/// it. All other triggers are true when either side found evidence.
pub fn merge_triggers(
    evaluated: &TriggerSet,
    classified: &TriggerSet,
    reported: &TriggerSet,
    defaults: &TriggerDefaults,
) -> TriggerSet {
    TriggerSet::from_fn(|trigger| match defaults.default_for(trigger) {
        Some(true) => {
            evaluated.get(trigger) && (!reported.get(trigger) || classified.get(trigger))
        }
        _ => evaluated.get(trigger) || classified.get(trigger),
    })
}

/// Whether the message reaches for a premium capability.
pub fn premium_access_attempted(
    product_interest: Option<ProductInterest>,
    triggers: &TriggerSet,
) -> bool {
    product_interest.is_some() || triggers.feature_discovery_attempts
}

/// The action each intent leads to.
pub fn action_for(intent: Intent, org_size: OrgSize) -> RecommendedAction {
    match (intent, org_size) {
        (Intent::Expansion, OrgSize::SmallClinic) => RecommendedAction::AutoSoftsell,
        (Intent::Expansion, OrgSize::Enterprise) => RecommendedAction::SalesHandoff,
        (Intent::Training, _) => RecommendedAction::SendTutorial,
        (Intent::Bug, _) => RecommendedAction::EscalateTech,
        (Intent::Reonboarding, _) => RecommendedAction::ScheduleReonboarding,
        (Intent::General, _) => RecommendedAction::StandardReply,
    }
}

pub fn resolve(
    candidate: &ValidatedCandidate,
    evaluated: &TriggerSet,
    defaults: &TriggerDefaults,
    org_size: OrgSize,
) -> Resolution {
    let triggers = merge_triggers(evaluated, &candidate.triggers, &candidate.reported, defaults);
    let intent = if premium_access_attempted(candidate.product_interest, &triggers) {
        Intent::Expansion
    } else {
        candidate.intent
    };

    Resolution {
        intent,
        classified_intent: candidate.intent,
        recommended_action: action_for(intent, org_size),
        triggers,
        org_size,
    }
}
