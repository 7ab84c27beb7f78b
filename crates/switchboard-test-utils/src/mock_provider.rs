// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted classifier for deterministic testing.
//!
//! `MockProvider` implements `ClassifierProvider` by popping pre-configured
//! replies, enabling fast, CI-runnable tests without a model endpoint.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use switchboard_core::{
    AdapterFailureKind, ClassifierProvider, HealthStatus, Intent, PluginAdapter, PolicySpec,
    SwitchboardError,
};
use tokio::sync::Mutex;

/// One scripted answer.
#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    /// Text handed back verbatim as the model's answer.
    Raw(String),
    /// The call fails with an adapter error of this kind.
    Failure {
        kind: AdapterFailureKind,
        message: String,
    },
    /// Sleeps, then answers with the inner reply.
    Delayed { delay: Duration, reply: Box<MockReply> },
}

impl MockReply {
    pub fn payload(value: Value) -> Self {
        Self::Raw(value.to_string())
    }

    pub fn raw(text: impl Into<String>) -> Self {
        Self::Raw(text.into())
    }

    pub fn failure(kind: AdapterFailureKind) -> Self {
        Self::Failure {
            kind,
            message: format!("scripted {kind} failure"),
        }
    }

    /// Wraps this reply behind a delay.
    #[must_use]
    pub fn after(self, delay: Duration) -> Self {
        Self::Delayed {
            delay,
            reply: Box::new(self),
        }
    }
}

/// A minimal schema-shaped payload for `intent` at `confidence`.
///
/// Triggers are left empty, so the evaluator's view of the message decides them.
pub fn classification(intent: Intent, confidence: f64) -> Value {
    json!({
        "intent": intent,
        "confidence": confidence,
        "product_interest": null,
        "sentiment": "neutral",
        "triggers": {},
        "reasoning": format!("Scripted {intent} classification."),
    })
}

/// A classifier that returns scripted replies.
///
/// Replies are popped from a FIFO queue. When the queue is empty, a general
/// intent payload at 0.5 confidence is returned.
#[derive(Debug, Default)]
pub struct MockProvider {
    replies: Mutex<VecDeque<MockReply>>,
    received: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl MockProvider {
    /// Create a new mock provider with an empty reply queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock provider pre-loaded with the given replies.
    pub fn with_replies(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Mutex::new(VecDeque::from(replies)),
            ..Self::default()
        }
    }

    /// Add a reply to the end of the queue.
    pub async fn push(&self, reply: MockReply) {
        self.replies.lock().await.push_back(reply);
    }

    /// Number of `predict` calls so far, including failed ones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Message texts in the order they were received.
    pub async fn received(&self) -> Vec<String> {
        self.received.lock().await.clone()
    }

    async fn next_reply(&self) -> MockReply {
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| MockReply::payload(classification(Intent::General, 0.5)))
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, SwitchboardError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ClassifierProvider for MockProvider {
    async fn predict(&self, text: &str, _policy: &PolicySpec) -> Result<String, SwitchboardError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.received.lock().await.push(text.to_string());

        let mut reply = self.next_reply().await;
        loop {
            match reply {
                MockReply::Raw(text) => return Ok(text),
                MockReply::Failure { kind, message } => {
                    return Err(SwitchboardError::adapter(kind, message));
                }
                MockReply::Delayed { delay, reply: inner } => {
                    tokio::time::sleep(delay).await;
                    reply = *inner;
                }
            }
        }
    }
}
