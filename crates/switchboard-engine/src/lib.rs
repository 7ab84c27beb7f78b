// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent classification and routing for inbound support messages.
//!
//! This crate provides:
//! - [`TriggerEvaluator`]: the ten expansion triggers from message text
//! - [`OrgSizeDetector`]: small clinic or enterprise, from head counts and keywords
//! - [`IntentClassifierAdapter`]: bounded, optionally retried calls to a
//!   [`ClassifierProvider`](switchboard_core::ClassifierProvider)
//! - [`validate()`]: schema validation and repair of untrusted output
//! - [`resolve()`] and [`route()`]: precedence override, default action and the routing table
//! - [`HeuristicProvider`]: offline keyword classifier
//! - [`DecisionEngine`]: the whole pipeline behind one `classify` call

pub mod adapter;
pub mod cues;
pub mod engine;
pub mod heuristic;
pub mod org_size;
pub mod resolve;
pub mod router;
pub mod triggers;
pub mod validate;

pub use adapter::{ClassificationCandidate, IntentClassifierAdapter, RetryPolicy};
pub use engine::{DecisionEngine, EngineOptions};
pub use heuristic::{HeuristicProvider, HeuristicVerdict};
pub use org_size::{OrgSizeDetector, OrgSizeSignal};
pub use resolve::{action_for, merge_triggers, resolve, Resolution};
pub use router::{route, Route, ROUTES};
pub use triggers::TriggerEvaluator;
pub use validate::{validate, ValidatedCandidate};
