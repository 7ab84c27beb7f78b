// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the engine, the providers and the transports.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::error::{ErrorRecord, SwitchboardError};

/// Number of expansion triggers in every [`TriggerSet`].
pub const TRIGGERS_TOTAL: usize = 10;

/// Health status reported by provider health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Provider is fully operational.
    Healthy,
    /// Provider is operational but experiencing issues.
    Degraded(String),
    /// Provider is not operational.
    Unhealthy(String),
}

/// An inbound customer-support message. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message(String);

impl Message {
    /// Wraps `text`, rejecting empty and whitespace-only input.
    pub fn new(text: impl Into<String>) -> Result<Self, SwitchboardError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(SwitchboardError::InvalidMessage(
                "message must not be empty".to_string(),
            ));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Coarse category of a support message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Expansion,
    Training,
    Bug,
    Reonboarding,
    General,
}

/// Premium capability the customer is reaching for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum ProductInterest {
    VideoCalls,
    PremiumSuite,
    Analytics,
}

/// Tone of the message.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Frustrated,
    Angry,
}

/// Next step for the receiving team.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    AutoSoftsell,
    SalesHandoff,
    SendTutorial,
    EscalateTech,
    ScheduleReonboarding,
    StandardReply,
}

/// Team that owns the follow-up.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Team {
    ExpansionAuto,
    EnterpriseSales,
    #[strum(serialize = "support_l1")]
    #[serde(rename = "support_l1")]
    SupportL1,
    SupportTech,
    CustomerSuccess,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// Account size as far as routing is concerned.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrgSize {
    /// Fewer seats than the enterprise threshold, or no size signal at all.
    #[default]
    SmallClinic,
    Enterprise,
}

/// Names of the ten expansion triggers, in record order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    NotOnPremium,
    OnboardingCompleted,
    NoActiveIncidents,
    HighEngagement,
    GoodStanding,
    FeatureDiscoveryAttempts,
    PositiveSentiment,
    UsageVelocityPositive,
    MultiUserGrowth,
    ContractRenewalSoon,
}

impl Trigger {
    /// All triggers in record order.
    pub fn all() -> impl Iterator<Item = Trigger> {
        Trigger::iter()
    }

    /// Wire name of the trigger.
    pub fn key(self) -> &'static str {
        match self {
            Trigger::NotOnPremium => "not_on_premium",
            Trigger::OnboardingCompleted => "onboarding_completed",
            Trigger::NoActiveIncidents => "no_active_incidents",
            Trigger::HighEngagement => "high_engagement",
            Trigger::GoodStanding => "good_standing",
            Trigger::FeatureDiscoveryAttempts => "feature_discovery_attempts",
            Trigger::PositiveSentiment => "positive_sentiment",
            Trigger::UsageVelocityPositive => "usage_velocity_positive",
            Trigger::MultiUserGrowth => "multi_user_growth",
            Trigger::ContractRenewalSoon => "contract_renewal_soon",
        }
    }
}

/// The ten expansion triggers. Field order is the serialized order.
///
/// Deserialization is strict: all ten keys must be present and boolean.
/// Untrusted classifier output goes through the validator instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TriggerSet {
    pub not_on_premium: bool,
    pub onboarding_completed: bool,
    pub no_active_incidents: bool,
    pub high_engagement: bool,
    pub good_standing: bool,
    pub feature_discovery_attempts: bool,
    pub positive_sentiment: bool,
    pub usage_velocity_positive: bool,
    pub multi_user_growth: bool,
    pub contract_renewal_soon: bool,
}

impl TriggerSet {
    pub fn get(&self, trigger: Trigger) -> bool {
        match trigger {
            Trigger::NotOnPremium => self.not_on_premium,
            Trigger::OnboardingCompleted => self.onboarding_completed,
            Trigger::NoActiveIncidents => self.no_active_incidents,
            Trigger::HighEngagement => self.high_engagement,
            Trigger::GoodStanding => self.good_standing,
            Trigger::FeatureDiscoveryAttempts => self.feature_discovery_attempts,
            Trigger::PositiveSentiment => self.positive_sentiment,
            Trigger::UsageVelocityPositive => self.usage_velocity_positive,
            Trigger::MultiUserGrowth => self.multi_user_growth,
            Trigger::ContractRenewalSoon => self.contract_renewal_soon,
        }
    }

    /// Returns a copy with `trigger` set to `value`.
    #[must_use]
    pub fn with(mut self, trigger: Trigger, value: bool) -> Self {
        let slot = match trigger {
            Trigger::NotOnPremium => &mut self.not_on_premium,
            Trigger::OnboardingCompleted => &mut self.onboarding_completed,
            Trigger::NoActiveIncidents => &mut self.no_active_incidents,
            Trigger::HighEngagement => &mut self.high_engagement,
            Trigger::GoodStanding => &mut self.good_standing,
            Trigger::FeatureDiscoveryAttempts => &mut self.feature_discovery_attempts,
            Trigger::PositiveSentiment => &mut self.positive_sentiment,
            Trigger::UsageVelocityPositive => &mut self.usage_velocity_positive,
            Trigger::MultiUserGrowth => &mut self.multi_user_growth,
            Trigger::ContractRenewalSoon => &mut self.contract_renewal_soon,
        };
        *slot = value;
        self
    }

    /// Builds a set from a per-trigger function.
    pub fn from_fn(mut f: impl FnMut(Trigger) -> bool) -> Self {
        Trigger::all().fold(Self::default(), |set, t| set.with(t, f(t)))
    }

    /// `(trigger, value)` pairs in record order.
    pub fn iter(&self) -> impl Iterator<Item = (Trigger, bool)> + '_ {
        Trigger::all().map(move |t| (t, self.get(t)))
    }

    /// Number of triggers that are true.
    pub fn met(&self) -> usize {
        self.iter().filter(|(_, v)| *v).count()
    }
}

/// Where a decision goes and how fast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub team: Team,
    pub priority: Priority,
    /// One of 2, 4, 24, 48.
    pub sla_hours: u32,
}

/// The complete, schema-valid output for one message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub intent: Intent,
    /// Always within `0.0..=1.0`.
    pub confidence: f64,
    pub product_interest: Option<ProductInterest>,
    pub sentiment: Sentiment,
    pub triggers: TriggerSet,
    pub triggers_met: usize,
    pub triggers_total: usize,
    pub recommended_action: RecommendedAction,
    pub routing: RoutingDecision,
    pub reasoning: String,
}

/// What `classify` hands back to a transport: a decision or an error record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ClassifyResponse {
    Decision(Box<Decision>),
    Error(ErrorRecord),
}

impl ClassifyResponse {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl From<Result<Decision, SwitchboardError>> for ClassifyResponse {
    fn from(result: Result<Decision, SwitchboardError>) -> Self {
        match result {
            Ok(decision) => Self::Decision(Box::new(decision)),
            Err(err) => Self::Error(err.to_record()),
        }
    }
}
