// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The decision pipeline: evaluate, classify, validate, resolve, route.

use std::sync::Arc;
use std::time::Duration;

use switchboard_core::{
    ClassifierProvider, ClassifyResponse, Decision, HealthStatus, Message, PolicySpec,
    SwitchboardError, TRIGGERS_TOTAL,
};
use tracing::{debug, info, warn};

use crate::adapter::{IntentClassifierAdapter, RetryPolicy};
use crate::org_size::OrgSizeDetector;
use crate::resolve::resolve;
use crate::router::route;
use crate::triggers::TriggerEvaluator;
use crate::validate::validate;

/// Adapter tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::none(),
        }
    }
}

/// Stateless per message; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    policy: Arc<PolicySpec>,
    evaluator: TriggerEvaluator,
    org_size: OrgSizeDetector,
    adapter: IntentClassifierAdapter,
}

impl DecisionEngine {
    pub fn new(
        provider: Arc<dyn ClassifierProvider>,
        policy: PolicySpec,
        options: EngineOptions,
    ) -> Self {
        let policy = Arc::new(policy);
        let adapter = IntentClassifierAdapter::new(provider, Arc::clone(&policy), options.timeout)
            .with_retry(options.retry);
        Self {
            evaluator: TriggerEvaluator::new(*policy.defaults()),
            org_size: OrgSizeDetector::new(policy.enterprise_seat_threshold()),
            adapter,
            policy,
        }
    }

    pub fn policy(&self) -> &PolicySpec {
        &self.policy
    }

    pub fn provider_name(&self) -> &str {
        self.adapter.provider().name()
    }

    /// Health of the underlying provider; a failing check reports unhealthy.
    pub async fn health(&self) -> HealthStatus {
        match self.adapter.provider().health_check().await {
            Ok(status) => status,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        }
    }

    /// Releases provider resources.
    pub async fn shutdown(&self) -> Result<(), SwitchboardError> {
        self.adapter.provider().shutdown().await
    }

    /// Classifies one message into a complete decision.
    ///
    /// Never returns a partial decision: any failing stage fails the call.
    pub async fn classify(&self, text: &str) -> Result<Decision, SwitchboardError> {
        let message = Message::new(text)?;
        debug!(message = %message, "classifying message");

        let evaluated = self.evaluator.evaluate(&message);
        let org = self.org_size.detect(&message);
        debug!(
            triggers_met = evaluated.met(),
            org_size = %org.size,
            seat_count = ?org.seat_count,
            "evaluated message"
        );

        let candidate = self.adapter.classify(&message).await.inspect_err(|e| {
            warn!(provider = self.provider_name(), error = %e, "classifier adapter failed");
        })?;

        let validated = validate(&candidate).inspect_err(|e| {
            warn!(error = %e, "classifier output rejected");
            debug!(raw = candidate.raw(), "rejected classifier output");
        })?;

        let resolution = resolve(
            &validated,
            &evaluated,
            self.policy.defaults(),
            org.size,
        );
        if resolution.overridden() {
            info!(
                from = %resolution.classified_intent,
                to = %resolution.intent,
                "premium access attempt overrides classified intent"
            );
        }

        let routing = route(resolution.intent, resolution.recommended_action, org.size)?;

        info!(
            intent = %resolution.intent,
            action = %resolution.recommended_action,
            team = %routing.team,
            priority = %routing.priority,
            sla_hours = routing.sla_hours,
            "decision routed"
        );

        Ok(Decision {
            intent: resolution.intent,
            confidence: validated.confidence,
            product_interest: validated.product_interest,
            sentiment: validated.sentiment,
            triggers: resolution.triggers,
            triggers_met: resolution.triggers.met(),
            triggers_total: TRIGGERS_TOTAL,
            recommended_action: resolution.recommended_action,
            routing,
            reasoning: validated.reasoning,
        })
    }

    /// Like [`classify`](Self::classify), but folds failures into an error record.
    pub async fn respond(&self, text: &str) -> ClassifyResponse {
        self.classify(text).await.into()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::json;
    use switchboard_core::{
        AdapterFailureKind, ErrorKind, Intent, OrgSize, PluginAdapter, Priority, ProductInterest,
        RecommendedAction, Team, TriggerDefaults,
    };

    use super::*;
    use crate::heuristic::HeuristicProvider;

    /// Always answers with the same text.
    struct Canned(String);

    #[async_trait]
    impl PluginAdapter for Canned {
        fn name(&self) -> &str {
            "canned"
        }
        fn version(&self) -> semver::Version {
            semver::Version::new(0, 1, 0)
        }
        async fn health_check(&self) -> Result<HealthStatus, SwitchboardError> {
            Err(SwitchboardError::Internal("not wired".into()))
        }
    }

    #[async_trait]
    impl ClassifierProvider for Canned {
        async fn predict(&self, _: &str, _: &PolicySpec) -> Result<String, SwitchboardError> {
            Ok(self.0.clone())
        }
    }

    fn heuristic() -> DecisionEngine {
        DecisionEngine::new(
            Arc::new(HeuristicProvider::new()),
            PolicySpec::default(),
            EngineOptions::default(),
        )
    }

    fn canned(raw: impl Into<String>) -> DecisionEngine {
        DecisionEngine::new(
            Arc::new(Canned(raw.into())),
            PolicySpec::default(),
            EngineOptions::default(),
        )
    }

    #[test]
    fn engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DecisionEngine>();
    }

    #[tokio::test]
    async fn small_clinic_video_calls_get_soft_sell() {
        let decision = heuristic()
            .classify("I want to use video calls for my clinic with 5 doctors")
            .await
            .unwrap();
        assert_eq!(decision.intent, Intent::Expansion);
        assert_eq!(decision.product_interest, Some(ProductInterest::VideoCalls));
        assert_eq!(decision.recommended_action, RecommendedAction::AutoSoftsell);
        assert_eq!(decision.routing.team, Team::ExpansionAuto);
        assert_eq!(decision.routing.priority, Priority::Medium);
        assert_eq!(decision.routing.sla_hours, 24);
        assert_eq!(decision.triggers_met, decision.triggers.met());
        assert_eq!(decision.triggers_total, 10);
    }

    #[tokio::test]
    async fn enterprise_analytics_goes_to_sales() {
        let decision = heuristic()
            .classify("Our enterprise account (50 seats) wants analytics access")
            .await
            .unwrap();
        assert_eq!(decision.intent, Intent::Expansion);
        assert_eq!(decision.recommended_action, RecommendedAction::SalesHandoff);
        assert_eq!(decision.routing.team, Team::EnterpriseSales);
        assert_eq!(decision.routing.priority, Priority::High);
        assert_eq!(decision.routing.sla_hours, 4);
    }

    #[tokio::test]
    async fn broken_sync_is_escalated() {
        let decision = heuristic().classify("The calendar sync is broken").await.unwrap();
        assert_eq!(decision.intent, Intent::Bug);
        assert_eq!(decision.recommended_action, RecommendedAction::EscalateTech);
        assert_eq!(decision.routing.team, Team::SupportTech);
        assert_eq!(decision.routing.sla_hours, 2);
        assert!(!decision.triggers.no_active_incidents);
    }

    #[tokio::test]
    async fn product_interest_overrides_classified_bug() {
        let raw = json!({
            "intent": "bug",
            "confidence": 0.7,
            "product_interest": "premium_suite",
            "sentiment": "frustrated",
            "triggers": {},
            "reasoning": "Premium suite login fails."
        });
        let decision = canned(raw.to_string())
            .classify("Our 40 doctors cannot open the premium suite")
            .await
            .unwrap();
        assert_eq!(decision.intent, Intent::Expansion);
        assert_eq!(decision.recommended_action, RecommendedAction::SalesHandoff);
        assert_eq!(decision.reasoning, "Premium suite login fails.");
    }

    #[tokio::test]
    async fn self_reported_trigger_count_is_ignored() {
        let raw = json!({
            "intent": "general",
            "confidence": 0.9,
            "triggers": {"positive_sentiment": true},
            "triggers_met": 10,
            "triggers_total": 3
        });
        let decision = canned(raw.to_string()).classify("Hello there").await.unwrap();
        // Five true-by-default assumptions plus positive sentiment.
        assert_eq!(decision.triggers_met, 6);
        assert_eq!(decision.triggers_total, 10);
    }

    fn all_triggers_reported(overrides: serde_json::Value) -> serde_json::Value {
        let mut triggers = json!({
            "not_on_premium": true,
            "onboarding_completed": true,
            "no_active_incidents": true,
            "high_engagement": true,
            "good_standing": true,
            "feature_discovery_attempts": false,
            "positive_sentiment": false,
            "usage_velocity_positive": false,
            "multi_user_growth": false,
            "contract_renewal_soon": false
        });
        if let (Some(map), Some(extra)) = (triggers.as_object_mut(), overrides.as_object()) {
            map.extend(extra.clone());
        }
        triggers
    }

    #[tokio::test]
    async fn app_upgrade_and_account_unlock_stay_bugs() {
        let raw = json!({
            "intent": "bug",
            "confidence": 0.9,
            "product_interest": null,
            "sentiment": "frustrated",
            "triggers": all_triggers_reported(json!({"no_active_incidents": false})),
            "reasoning": "Login is failing."
        });
        for text in [
            "Since last night's app upgrade, nobody can log in",
            "I can't unlock my account after the password reset",
        ] {
            let decision = canned(raw.to_string()).classify(text).await.unwrap();
            assert_eq!(decision.intent, Intent::Bug, "{text}");
            assert!(!decision.triggers.feature_discovery_attempts, "{text}");
            assert_eq!(decision.recommended_action, RecommendedAction::EscalateTech);
            assert_eq!(decision.routing.team, Team::SupportTech);
            assert_eq!(decision.routing.sla_hours, 2);
        }
    }

    #[tokio::test]
    async fn classifier_evidence_clears_true_assumptions() {
        let raw = json!({
            "intent": "bug",
            "confidence": 0.8,
            "product_interest": null,
            "sentiment": "frustrated",
            "triggers": all_triggers_reported(json!({
                "no_active_incidents": false,
                "good_standing": false,
                "high_engagement": false,
                "onboarding_completed": false
            })),
            "reasoning": "Booking outage and overdue invoice."
        });
        let decision = canned(raw.to_string())
            .classify("Patients see a 500 page when booking and our invoice from March remains in arrears")
            .await
            .unwrap();
        let t = decision.triggers;
        assert!(!t.no_active_incidents);
        assert!(!t.good_standing);
        assert!(!t.high_engagement);
        assert!(!t.onboarding_completed);
        assert!(t.not_on_premium);
        assert_eq!(decision.triggers_met, 1);
    }

    #[tokio::test]
    async fn non_json_answer_is_adapter_failure_with_raw_text() {
        let response = canned("I think this is a bug.").respond("It crashed").await;
        let ClassifyResponse::Error(record) = response else {
            panic!("expected an error record");
        };
        assert_eq!(record.kind, ErrorKind::AdapterFailure);
        assert_eq!(record.failure, Some(AdapterFailureKind::Undecodable));
        assert_eq!(record.raw_output.as_deref(), Some("I think this is a bug."));
    }

    #[tokio::test]
    async fn unknown_intent_is_validation_failure() {
        let raw = json!({"intent": "unknown_value", "confidence": 0.4});
        let response = canned(raw.to_string()).respond("Hello").await;
        let ClassifyResponse::Error(record) = response else {
            panic!("expected an error record");
        };
        assert_eq!(record.kind, ErrorKind::ValidationFailure);
        assert_eq!(record.fields, Some(vec!["intent".to_string()]));
    }

    #[tokio::test]
    async fn blank_message_is_rejected_before_the_provider() {
        let err = canned("{}").classify("   \n").await.unwrap_err();
        assert!(matches!(err, SwitchboardError::InvalidMessage(_)));
    }

    #[tokio::test]
    async fn premium_deployment_still_routes_by_size() {
        let policy = PolicySpec::new(
            TriggerDefaults {
                not_on_premium: false,
                ..TriggerDefaults::default()
            },
            20,
        );
        let engine = DecisionEngine::new(
            Arc::new(HeuristicProvider::new()),
            policy,
            EngineOptions::default(),
        );
        let decision = engine.classify("Can we get video consults?").await.unwrap();
        assert!(!decision.triggers.not_on_premium);
        assert_eq!(decision.recommended_action, RecommendedAction::AutoSoftsell);
        assert_eq!(engine.org_size.detect(&Message::new("50 seats").unwrap()).size, OrgSize::Enterprise);
    }

    #[tokio::test]
    async fn health_reflects_provider() {
        assert_eq!(heuristic().health().await, HealthStatus::Healthy);
        assert!(matches!(canned("{}").health().await, HealthStatus::Unhealthy(_)));
        assert_eq!(heuristic().provider_name(), "heuristic");
    }
}
