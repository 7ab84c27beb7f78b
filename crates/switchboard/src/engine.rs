// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Engine assembly from configuration.

use std::sync::Arc;
use std::time::Duration;

use switchboard_config::model::{ClassifierConfig, ProviderKind};
use switchboard_config::SwitchboardConfig;
use switchboard_core::{ClassifierProvider, PolicySpec, SwitchboardError};
use switchboard_engine::{DecisionEngine, EngineOptions, HeuristicProvider, RetryPolicy};
use switchboard_openai::OpenAiProvider;
use tracing::info;

/// Builds the decision engine for the configured provider.
///
/// Fails with a configuration error when the OpenAI provider has no API key.
pub fn build_engine(config: &SwitchboardConfig) -> Result<DecisionEngine, SwitchboardError> {
    let provider: Arc<dyn ClassifierProvider> = match config.classifier.provider {
        ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(config)?),
        ProviderKind::Heuristic => Arc::new(HeuristicProvider::new()),
    };

    let policy = PolicySpec::new(
        config.policy.trigger_defaults(),
        config.policy.enterprise_seat_threshold,
    );
    let options = engine_options(&config.classifier);

    info!(
        provider = provider.name(),
        timeout_secs = options.timeout.as_secs(),
        max_retries = options.retry.max_retries(),
        "decision engine ready"
    );

    Ok(DecisionEngine::new(provider, policy, options))
}

fn engine_options(classifier: &ClassifierConfig) -> EngineOptions {
    EngineOptions {
        timeout: Duration::from_secs(classifier.timeout_secs),
        retry: RetryPolicy::new(
            classifier.max_retries,
            Duration::from_millis(classifier.retry_backoff_ms),
        ),
    }
}
