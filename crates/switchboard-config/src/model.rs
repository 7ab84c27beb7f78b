// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Switchboard.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};
use switchboard_core::TriggerDefaults;

/// Top-level Switchboard configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SwitchboardConfig {
    /// Service identity and logging.
    #[serde(default)]
    pub service: ServiceConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Classification capability selection, timeout and retry policy.
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// OpenAI-compatible provider settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Default assumptions and org-size threshold.
    #[serde(default)]
    pub policy: PolicyConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Display name used in logs and health output.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "switchboard".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind the server to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind the server to.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Allow any origin, method and header (browser front-ends on other hosts).
    #[serde(default = "default_cors_permissive")]
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_permissive: default_cors_permissive(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_permissive() -> bool {
    true
}

/// Which classification capability backs the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum ProviderKind {
    /// Hosted model behind an OpenAI-compatible Chat Completions endpoint.
    #[default]
    #[serde(rename = "openai")]
    OpenAi,
    /// Offline keyword classifier.
    #[serde(rename = "heuristic")]
    Heuristic,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::OpenAi => write!(f, "openai"),
            ProviderKind::Heuristic => write!(f, "heuristic"),
        }
    }
}

/// Classification capability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Capability to use.
    #[serde(default)]
    pub provider: ProviderKind,

    /// Upper bound for one classification call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries after a transient adapter failure. 0 disables retrying.
    #[serde(default)]
    pub max_retries: u32,

    /// Backoff before the first retry, doubled for each further attempt.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            timeout_secs: default_timeout_secs(),
            max_retries: 0,
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_retry_backoff_ms() -> u64 {
    500
}

/// OpenAI-compatible provider configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// API key. `None` falls back to the `OPENAI_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the API, without the `/chat/completions` suffix.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Sampling temperature.
    #[serde(default)]
    pub temperature: f32,

    /// Maximum tokens to generate per classification.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Ask the API to constrain output to a JSON object.
    #[serde(default = "default_json_mode")]
    pub json_mode: bool,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            temperature: 0.0,
            max_tokens: default_max_tokens(),
            json_mode: default_json_mode(),
        }
    }
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("json_mode", &self.json_mode)
            .finish()
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_max_tokens() -> u32 {
    800
}

fn default_json_mode() -> bool {
    true
}

/// Default customer assumptions and the enterprise seat threshold.
///
/// Frozen at startup and passed explicitly to the trigger evaluator.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    #[serde(default = "default_true")]
    pub not_on_premium: bool,

    #[serde(default = "default_true")]
    pub onboarding_completed: bool,

    #[serde(default = "default_true")]
    pub no_active_incidents: bool,

    #[serde(default = "default_true")]
    pub high_engagement: bool,

    #[serde(default = "default_true")]
    pub good_standing: bool,

    #[serde(default)]
    pub contract_renewal_soon: bool,

    /// Seat count at which an account counts as enterprise.
    #[serde(default = "default_enterprise_seat_threshold")]
    pub enterprise_seat_threshold: u32,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        let defaults = TriggerDefaults::default();
        Self {
            not_on_premium: defaults.not_on_premium,
            onboarding_completed: defaults.onboarding_completed,
            no_active_incidents: defaults.no_active_incidents,
            high_engagement: defaults.high_engagement,
            good_standing: defaults.good_standing,
            contract_renewal_soon: defaults.contract_renewal_soon,
            enterprise_seat_threshold: default_enterprise_seat_threshold(),
        }
    }
}

impl PolicyConfig {
    /// The trigger defaults this policy describes.
    pub fn trigger_defaults(&self) -> TriggerDefaults {
        TriggerDefaults {
            not_on_premium: self.not_on_premium,
            onboarding_completed: self.onboarding_completed,
            no_active_incidents: self.no_active_incidents,
            high_engagement: self.high_engagement,
            good_standing: self.good_standing,
            contract_renewal_soon: self.contract_renewal_soon,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_enterprise_seat_threshold() -> u32 {
    20
}

impl SwitchboardConfig {
    /// Copy of the config with secrets replaced, safe to print.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.openai.api_key.is_some() {
            config.openai.api_key = Some("[redacted]".to_string());
        }
        config
    }

    /// Renders the config as TOML with secrets redacted.
    pub fn to_redacted_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&self.redacted())
    }
}
