// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Switchboard support-message decision engine.
//!
//! This crate provides the domain types (intents, triggers, the decision
//! record), the frozen classification policy, the error taxonomy, and the
//! provider trait every classification capability implements.

pub mod error;
pub mod policy;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{AdapterFailureKind, ErrorKind, ErrorRecord, SwitchboardError};
pub use policy::{PolicySpec, TriggerDefaults};
pub use types::{
    ClassifyResponse, Decision, HealthStatus, Intent, Message, OrgSize, Priority,
    ProductInterest, RecommendedAction, RoutingDecision, Sentiment, Team, Trigger, TriggerSet,
    TRIGGERS_TOTAL,
};

pub use traits::{ClassifierProvider, PluginAdapter};
