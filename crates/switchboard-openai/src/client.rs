// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the OpenAI Chat Completions API.
//!
//! Provides [`OpenAiClient`] which handles request construction and
//! bearer authentication. Works against any OpenAI-compatible endpoint.
//! Each call is a single HTTP exchange; retrying is left to the adapter's
//! retry policy.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use switchboard_core::{AdapterFailureKind, SwitchboardError};
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse};

/// HTTP client for OpenAI API communication.
///
/// Manages authentication headers and connection pooling.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    endpoint: String,
}

impl OpenAiClient {
    /// Creates a new client.
    ///
    /// # Arguments
    /// * `api_key` - bearer token
    /// * `base_url` - API root without the `/chat/completions` suffix
    /// * `timeout` - upper bound for one HTTP exchange
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self, SwitchboardError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
            SwitchboardError::Config(format!("invalid API key header value: {e}"))
        })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| SwitchboardError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends one completion request and returns the full response.
    ///
    /// Makes exactly one outbound call. Non-success statuses surface as
    /// upstream failures carrying the API's error message.
    pub async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, SwitchboardError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        debug!(status = %status, "completion response received");

        if status.is_success() {
            let body = response.text().await.map_err(transport_error)?;
            return serde_json::from_str(&body).map_err(|e| SwitchboardError::Adapter {
                kind: AdapterFailureKind::Upstream,
                message: format!("failed to parse API response: {e}"),
                raw_output: Some(body),
                source: Some(Box::new(e)),
            });
        }

        let body = response.text().await.unwrap_or_default();
        if status.as_u16() == 429 || status.is_server_error() {
            warn!(status = %status, "transient completion error");
        }
        Err(SwitchboardError::adapter(
            AdapterFailureKind::Upstream,
            upstream_message(status, &body),
        ))
    }
}

fn transport_error(e: reqwest::Error) -> SwitchboardError {
    let kind = if e.is_timeout() {
        AdapterFailureKind::Timeout
    } else {
        AdapterFailureKind::Unreachable
    };
    SwitchboardError::Adapter {
        kind,
        message: format!("HTTP request failed: {e}"),
        raw_output: None,
        source: Some(Box::new(e)),
    }
}

fn upstream_message(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(api_err) => format!(
            "OpenAI API error ({}): {}",
            api_err.error.type_.as_deref().unwrap_or("unknown"),
            api_err.error.message
        ),
        Err(_) => format!("API returned {status}"),
    }
}
