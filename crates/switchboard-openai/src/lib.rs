// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI classifier provider for Switchboard.
//!
//! This crate implements [`ClassifierProvider`] on top of the Chat
//! Completions API. The rendered policy goes out as the system message, the
//! customer text as the user message, and the first choice's content comes
//! back untouched for the engine to decode and validate.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use switchboard_config::SwitchboardConfig;
use switchboard_core::{
    ClassifierProvider, HealthStatus, PluginAdapter, PolicySpec, SwitchboardError,
};
use tracing::{debug, info};

use crate::client::OpenAiClient;
use crate::types::{ChatCompletionRequest, ChatMessage, ResponseFormat};

/// Environment variable consulted when the config carries no API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// OpenAI provider implementing [`ClassifierProvider`].
///
/// API key resolution order: config -> `OPENAI_API_KEY` env var -> error.
pub struct OpenAiProvider {
    client: OpenAiClient,
    model: String,
    temperature: f32,
    max_tokens: u32,
    json_mode: bool,
}

impl OpenAiProvider {
    /// Creates a new provider from the given configuration.
    ///
    /// The HTTP timeout matches `classifier.timeout_secs`; the engine applies
    /// the same bound around the whole call.
    pub fn new(config: &SwitchboardConfig) -> Result<Self, SwitchboardError> {
        let api_key = resolve_api_key(&config.openai.api_key)?;
        let client = OpenAiClient::new(
            &api_key,
            &config.openai.base_url,
            Duration::from_secs(config.classifier.timeout_secs),
        )?;

        info!(
            model = config.openai.model,
            endpoint = client.endpoint(),
            "OpenAI provider initialized"
        );

        Ok(Self::with_client(client, config))
    }

    /// Creates a provider with an existing client.
    pub fn with_client(client: OpenAiClient, config: &SwitchboardConfig) -> Self {
        Self {
            client,
            model: config.openai.model.clone(),
            temperature: config.openai.temperature,
            max_tokens: config.openai.max_tokens,
            json_mode: config.openai.json_mode,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn to_request(&self, text: &str, policy: &PolicySpec) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(policy.system_prompt()),
                ChatMessage::user(text),
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            response_format: self.json_mode.then(ResponseFormat::json_object),
        }
    }
}

#[async_trait]
impl PluginAdapter for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, SwitchboardError> {
        // No API call: health checks must not consume tokens.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SwitchboardError> {
        debug!("OpenAI provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl ClassifierProvider for OpenAiProvider {
    async fn predict(&self, text: &str, policy: &PolicySpec) -> Result<String, SwitchboardError> {
        let request = self.to_request(text, policy);
        let response = self.client.complete(&request).await?;

        if let Some(usage) = response.usage {
            debug!(
                model = response.model.as_str(),
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "completion usage"
            );
        }

        match response.first_content() {
            Some(content) => Ok(content.to_string()),
            None => Err(SwitchboardError::undecodable(String::new())),
        }
    }
}

/// Resolves the API key from config or environment.
fn resolve_api_key(config_key: &Option<String>) -> Result<String, SwitchboardError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(key.clone());
    }

    match std::env::var(API_KEY_ENV) {
        Ok(key) if !key.is_empty() => Ok(key),
        _ => Err(SwitchboardError::Config(format!(
            "OpenAI API key not found. Set openai.api_key in config or the {API_KEY_ENV} environment variable."
        ))),
    }
}
