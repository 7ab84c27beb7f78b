// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::{self as axum_middleware, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use switchboard_core::SwitchboardError;
use switchboard_engine::DecisionEngine;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, info_span, Instrument};

use crate::handlers;

/// Response header carrying the per-request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The decision pipeline every request goes through.
    pub engine: Arc<DecisionEngine>,
    /// Process start time for uptime calculation.
    pub start_time: Instant,
}

impl GatewayState {
    pub fn new(engine: Arc<DecisionEngine>) -> Self {
        Self {
            engine,
            start_time: Instant::now(),
        }
    }
}

/// Gateway server configuration (mirrors `[server]` from switchboard-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Allow any origin, method and header.
    pub cors_permissive: bool,
}

/// Builds the router without binding a socket.
///
/// Routes:
/// - POST /classify
/// - GET /health
pub fn build_router(state: GatewayState, cors_permissive: bool) -> Router {
    let app = Router::new()
        .route("/classify", post(handlers::post_classify))
        .route("/health", get(handlers::get_health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(request_id));

    if cors_permissive {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Tags each request with a fresh v4 id, in its span and its response.
async fn request_id(request: Request, next: Next) -> Response {
    let id = uuid::Uuid::new_v4().to_string();
    let span = info_span!(
        "request",
        request_id = %id,
        method = %request.method(),
        path = request.uri().path(),
    );

    let mut response = next.run(request).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// Start the gateway HTTP server.
///
/// Binds to the configured host:port and serves until `shutdown` resolves.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), SwitchboardError> {
    let app = build_router(state, config.cors_permissive);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| SwitchboardError::Config(format!("failed to bind gateway to {addr}: {e}")))?;

    info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| SwitchboardError::Internal(format!("gateway server error: {e}")))?;

    info!("Gateway server stopped");
    Ok(())
}
