// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.
//!
//! Handles POST /classify and GET /health.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use switchboard_core::{AdapterFailureKind, HealthStatus, SwitchboardError};
use tracing::{debug, warn};

use crate::server::GatewayState;

/// Request body for POST /classify.
#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    /// Customer message text.
    pub message: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "ok", "degraded" or "unhealthy".
    pub status: String,
    /// Binary version.
    pub version: String,
    /// Classification capability behind the engine.
    pub provider: String,
    pub uptime_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// HTTP status for a failed classification.
pub fn status_for(err: &SwitchboardError) -> StatusCode {
    match err {
        SwitchboardError::InvalidMessage(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SwitchboardError::Adapter {
            kind: AdapterFailureKind::Timeout,
            ..
        } => StatusCode::GATEWAY_TIMEOUT,
        SwitchboardError::Adapter { .. } | SwitchboardError::Validation { .. } => {
            StatusCode::BAD_GATEWAY
        }
        SwitchboardError::Config(_) | SwitchboardError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn error_response(err: &SwitchboardError) -> Response {
    (status_for(err), Json(err.to_record())).into_response()
}

/// POST /classify
///
/// Runs one message through the decision engine. Failures come back as an
/// error record, never as a partial decision.
pub async fn post_classify(
    State(state): State<GatewayState>,
    payload: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            debug!(reason = %rejection.body_text(), "rejected request body");
            return error_response(&SwitchboardError::InvalidMessage(format!(
                "malformed request body: {}",
                rejection.body_text()
            )));
        }
    };

    match state.engine.classify(&body.message).await {
        Ok(decision) => (StatusCode::OK, Json(decision)).into_response(),
        Err(e) => {
            warn!(error = %e, "classification failed");
            error_response(&e)
        }
    }
}

/// GET /health
///
/// Reports the provider's health; an unhealthy provider answers 503.
pub async fn get_health(State(state): State<GatewayState>) -> Response {
    let (code, status, detail) = match state.engine.health().await {
        HealthStatus::Healthy => (StatusCode::OK, "ok", None),
        HealthStatus::Degraded(reason) => (StatusCode::OK, "degraded", Some(reason)),
        HealthStatus::Unhealthy(reason) => {
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", Some(reason))
        }
    };

    let body = HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        provider: state.engine.provider_name().to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        detail,
    };
    (code, Json(body)).into_response()
}
