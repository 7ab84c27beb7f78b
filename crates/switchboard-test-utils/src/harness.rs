// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles a [`DecisionEngine`] around either a scripted
//! [`MockProvider`] or the offline heuristic classifier, with the policy,
//! timeout and retry policy under test control.

use std::sync::Arc;
use std::time::Duration;

use switchboard_core::{
    ClassifierProvider, ClassifyResponse, Decision, PolicySpec, SwitchboardError, TriggerDefaults,
};
use switchboard_engine::{DecisionEngine, EngineOptions, HeuristicProvider, RetryPolicy};

use crate::mock_provider::{MockProvider, MockReply};

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    replies: Vec<MockReply>,
    heuristic: bool,
    defaults: TriggerDefaults,
    enterprise_seat_threshold: u32,
    options: EngineOptions,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            replies: Vec::new(),
            heuristic: false,
            defaults: TriggerDefaults::default(),
            enterprise_seat_threshold: 20,
            options: EngineOptions::default(),
        }
    }

    /// Queue scripted replies on the mock provider.
    pub fn with_replies(mut self, replies: Vec<MockReply>) -> Self {
        self.replies = replies;
        self
    }

    /// Classify with the offline heuristic instead of the mock.
    pub fn with_heuristic(mut self) -> Self {
        self.heuristic = true;
        self
    }

    pub fn with_defaults(mut self, defaults: TriggerDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_seat_threshold(mut self, threshold: u32) -> Self {
        self.enterprise_seat_threshold = threshold;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.options.retry = retry;
        self
    }

    /// Build the harness.
    pub fn build(self) -> TestHarness {
        let mock_provider = Arc::new(MockProvider::with_replies(self.replies));
        let provider: Arc<dyn ClassifierProvider> = if self.heuristic {
            Arc::new(HeuristicProvider::new())
        } else {
            mock_provider.clone()
        };

        let policy = PolicySpec::new(self.defaults, self.enterprise_seat_threshold);
        let engine = Arc::new(DecisionEngine::new(provider, policy, self.options));

        TestHarness {
            engine,
            mock_provider,
        }
    }
}

/// A decision engine plus handles for assertions.
pub struct TestHarness {
    /// The engine under test.
    pub engine: Arc<DecisionEngine>,
    /// The scripted provider. Never called when the heuristic was chosen.
    pub mock_provider: Arc<MockProvider>,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    pub async fn classify(&self, text: &str) -> Result<Decision, SwitchboardError> {
        self.engine.classify(text).await
    }

    pub async fn respond(&self, text: &str) -> ClassifyResponse {
        self.engine.respond(text).await
    }

    /// Add a reply to the mock provider's queue.
    pub async fn push_reply(&self, reply: MockReply) {
        self.mock_provider.push(reply).await;
    }
}
