// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded invocation of a classification capability.
//!
//! [`IntentClassifierAdapter`] makes one call per attempt under a timeout,
//! optionally retries transient failures with exponential backoff, and
//! decodes the answer into an untrusted [`ClassificationCandidate`].

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use switchboard_core::{
    AdapterFailureKind, ClassifierProvider, Message, PolicySpec, SwitchboardError,
};
use tracing::{debug, warn};

/// Upper bound for a single backoff delay.
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Decoded but untrusted classifier output.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationCandidate {
    payload: Map<String, Value>,
    raw: String,
}

impl ClassificationCandidate {
    /// Decodes a raw payload, tolerating one pair of surrounding code fences.
    pub fn from_raw(raw: impl Into<String>) -> Result<Self, SwitchboardError> {
        let raw = raw.into();
        match serde_json::from_str::<Value>(strip_code_fences(&raw)) {
            Ok(Value::Object(payload)) => Ok(Self { payload, raw }),
            _ => Err(SwitchboardError::undecodable(raw)),
        }
    }

    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.payload.get(field)
    }

    /// Text the payload was decoded from.
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line.
    match body.split_once('\n') {
        Some((info, inner)) if !info.trim_start().starts_with('{') => inner.trim(),
        _ => body.trim(),
    }
}

/// Bounded retry with exponential backoff. Only transient failures retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    base_backoff: Duration,
}

impl RetryPolicy {
    /// No retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_backoff: Duration::ZERO,
        }
    }

    pub fn new(max_retries: u32, base_backoff: Duration) -> Self {
        Self {
            max_retries,
            base_backoff,
        }
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Delay before retry number `retry` (1-based): base, 2x base, 4x base...
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.base_backoff.saturating_mul(factor).min(MAX_BACKOFF)
    }

    fn should_retry(&self, err: &SwitchboardError, retries_done: u32) -> bool {
        retries_done < self.max_retries && err.adapter_kind().is_some_and(|k| k.is_transient())
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

/// Wraps a [`ClassifierProvider`] with the frozen policy, a timeout and retries.
#[derive(Clone)]
pub struct IntentClassifierAdapter {
    provider: Arc<dyn ClassifierProvider>,
    policy: Arc<PolicySpec>,
    timeout: Duration,
    retry: RetryPolicy,
}

impl IntentClassifierAdapter {
    pub fn new(
        provider: Arc<dyn ClassifierProvider>,
        policy: Arc<PolicySpec>,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            policy,
            timeout,
            retry: RetryPolicy::none(),
        }
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn provider(&self) -> &Arc<dyn ClassifierProvider> {
        &self.provider
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Obtains a candidate classification for `message`.
    ///
    /// Undecodable content is never retried: the capability answered.
    pub async fn classify(
        &self,
        message: &Message,
    ) -> Result<ClassificationCandidate, SwitchboardError> {
        let mut retries = 0;
        loop {
            match self.attempt(message).await {
                Ok(raw) => {
                    debug!(bytes = raw.len(), "classifier answered");
                    return ClassificationCandidate::from_raw(raw);
                }
                Err(err) if self.retry.should_retry(&err, retries) => {
                    retries += 1;
                    let delay = self.retry.backoff(retries);
                    warn!(
                        provider = self.provider.name(),
                        retry = retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "transient classifier failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn attempt(&self, message: &Message) -> Result<String, SwitchboardError> {
        let call = self.provider.predict(message.as_str(), &self.policy);
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(raw)) => Ok(raw),
            Ok(Err(err @ SwitchboardError::Adapter { .. })) => Err(err),
            // Anything else the provider raises is still a capability failure.
            Ok(Err(err)) => Err(SwitchboardError::Adapter {
                kind: AdapterFailureKind::Unreachable,
                message: err.to_string(),
                raw_output: None,
                source: Some(Box::new(err)),
            }),
            Err(_) => Err(SwitchboardError::adapter(
                AdapterFailureKind::Timeout,
                format!(
                    "classifier did not answer within {} ms",
                    self.timeout.as_millis()
                ),
            )),
        }
    }
}

impl std::fmt::Debug for IntentClassifierAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentClassifierAdapter")
            .field("provider", &self.provider.name())
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use switchboard_core::{HealthStatus, PluginAdapter};

    use super::*;

    /// Replays scripted answers; each may be delayed.
    struct Scripted {
        answers: Mutex<VecDeque<(Duration, Result<String, SwitchboardError>)>>,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn new(answers: Vec<(Duration, Result<String, SwitchboardError>)>) -> Arc<Self> {
            Arc::new(Self {
                answers: Mutex::new(answers.into()),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PluginAdapter for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }
        fn version(&self) -> semver::Version {
            semver::Version::new(0, 1, 0)
        }
        async fn health_check(&self) -> Result<HealthStatus, SwitchboardError> {
            Ok(HealthStatus::Healthy)
        }
    }

    #[async_trait]
    impl ClassifierProvider for Scripted {
        async fn predict(&self, _text: &str, _policy: &PolicySpec) -> Result<String, SwitchboardError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self.answers.lock().unwrap().pop_front();
            let (delay, answer) =
                next.unwrap_or((Duration::ZERO, Ok(r#"{"intent":"general"}"#.into())));
            tokio::time::sleep(delay).await;
            answer
        }
    }

    fn adapter(provider: Arc<Scripted>, timeout: Duration) -> IntentClassifierAdapter {
        IntentClassifierAdapter::new(provider, Arc::new(PolicySpec::default()), timeout)
    }

    fn message() -> Message {
        Message::new("hello").unwrap()
    }

    fn unreachable() -> SwitchboardError {
        SwitchboardError::adapter(AdapterFailureKind::Unreachable, "connection refused")
    }

    #[test]
    fn candidate_decodes_plain_object() {
        let candidate = ClassificationCandidate::from_raw(r#"{"intent": "bug"}"#).unwrap();
        assert_eq!(candidate.get("intent"), Some(&Value::from("bug")));
        assert_eq!(candidate.raw(), r#"{"intent": "bug"}"#);
    }

    #[test]
    fn candidate_tolerates_code_fences() {
        let raw = "```json\n{\"intent\": \"training\"}\n```";
        let candidate = ClassificationCandidate::from_raw(raw).unwrap();
        assert_eq!(candidate.get("intent"), Some(&Value::from("training")));
        assert_eq!(candidate.raw(), raw);

        let bare = ClassificationCandidate::from_raw("```{\"intent\": \"bug\"}```").unwrap();
        assert_eq!(bare.get("intent"), Some(&Value::from("bug")));
    }

    #[test]
    fn non_json_is_undecodable_and_keeps_raw_text() {
        let err = ClassificationCandidate::from_raw("Sorry, I cannot help with that.").unwrap_err();
        let record = err.to_record();
        assert_eq!(record.failure, Some(AdapterFailureKind::Undecodable));
        assert_eq!(record.error, "model did not return valid JSON");
        assert_eq!(record.raw_output.as_deref(), Some("Sorry, I cannot help with that."));
    }

    #[test]
    fn json_that_is_not_an_object_is_undecodable() {
        for raw in ["[1, 2]", "\"bug\"", "42", "null", ""] {
            let err = ClassificationCandidate::from_raw(raw).unwrap_err();
            assert_eq!(err.adapter_kind(), Some(AdapterFailureKind::Undecodable), "{raw:?}");
        }
    }

    #[test]
    fn backoff_doubles_and_is_capped() {
        let retry = RetryPolicy::new(5, Duration::from_millis(100));
        assert_eq!(retry.backoff(1), Duration::from_millis(100));
        assert_eq!(retry.backoff(2), Duration::from_millis(200));
        assert_eq!(retry.backoff(3), Duration::from_millis(400));
        assert_eq!(RetryPolicy::new(1, Duration::from_secs(20)).backoff(4), MAX_BACKOFF);
    }

    #[tokio::test]
    async fn returns_candidate_on_success() {
        let provider = Scripted::new(vec![(Duration::ZERO, Ok(r#"{"intent":"bug"}"#.into()))]);
        let candidate = adapter(provider.clone(), Duration::from_secs(1))
            .classify(&message())
            .await
            .unwrap();
        assert_eq!(candidate.get("intent"), Some(&Value::from("bug")));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_provider_times_out() {
        let provider = Scripted::new(vec![(Duration::from_secs(10), Ok("{}".into()))]);
        let err = adapter(provider, Duration::from_secs(2))
            .classify(&message())
            .await
            .unwrap_err();
        assert_eq!(err.adapter_kind(), Some(AdapterFailureKind::Timeout));
    }

    #[tokio::test]
    async fn failures_are_not_retried_by_default() {
        let provider = Scripted::new(vec![(Duration::ZERO, Err(unreachable()))]);
        let err = adapter(provider.clone(), Duration::from_secs(1))
            .classify(&message())
            .await
            .unwrap_err();
        assert_eq!(err.adapter_kind(), Some(AdapterFailureKind::Unreachable));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failures_are_retried_up_to_the_limit() {
        let provider = Scripted::new(vec![
            (Duration::ZERO, Err(unreachable())),
            (Duration::ZERO, Err(unreachable())),
            (Duration::ZERO, Ok(r#"{"intent":"training"}"#.into())),
        ]);
        let candidate = adapter(provider.clone(), Duration::from_secs(1))
            .with_retry(RetryPolicy::new(2, Duration::from_millis(50)))
            .classify(&message())
            .await
            .unwrap();
        assert_eq!(candidate.get("intent"), Some(&Value::from("training")));
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_stop_after_the_limit() {
        let provider = Scripted::new(vec![
            (Duration::ZERO, Err(unreachable())),
            (Duration::ZERO, Err(unreachable())),
        ]);
        let err = adapter(provider.clone(), Duration::from_secs(1))
            .with_retry(RetryPolicy::new(1, Duration::from_millis(50)))
            .classify(&message())
            .await
            .unwrap_err();
        assert_eq!(err.adapter_kind(), Some(AdapterFailureKind::Unreachable));
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn undecodable_content_is_not_retried() {
        let provider = Scripted::new(vec![(Duration::ZERO, Ok("not json".into()))]);
        let err = adapter(provider.clone(), Duration::from_secs(1))
            .with_retry(RetryPolicy::new(3, Duration::from_millis(50)))
            .classify(&message())
            .await
            .unwrap_err();
        assert_eq!(err.adapter_kind(), Some(AdapterFailureKind::Undecodable));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn non_adapter_provider_errors_become_adapter_failures() {
        let provider = Scripted::new(vec![(
            Duration::ZERO,
            Err(SwitchboardError::Config("missing api key".into())),
        )]);
        let err = adapter(provider, Duration::from_secs(1))
            .classify(&message())
            .await
            .unwrap_err();
        assert_eq!(err.adapter_kind(), Some(AdapterFailureKind::Unreachable));
        assert!(err.to_string().contains("missing api key"));
    }
}
