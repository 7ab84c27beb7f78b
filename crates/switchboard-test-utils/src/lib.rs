// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Switchboard integration tests.
//!
//! Provides a scripted classifier and a harness that wires it into a
//! [`DecisionEngine`](switchboard_engine::DecisionEngine), so tests run fast
//! and deterministically without a model endpoint.
//!
//! # Components
//!
//! - [`MockProvider`] - Scripted classifier with queued payloads, failures and delays
//! - [`TestHarness`] - Engine assembled around a mock or the heuristic provider

pub mod harness;
pub mod mock_provider;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_provider::{classification, MockProvider, MockReply};
