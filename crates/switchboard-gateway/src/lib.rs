// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP transport for the Switchboard decision engine.
//!
//! Exposes `POST /classify` and `GET /health` over axum, with permissive
//! CORS for browser front-ends and a request id on every response.

pub mod handlers;
pub mod server;

pub use handlers::{status_for, ClassifyRequest, HealthResponse};
pub use server::{build_router, start_server, GatewayState, ServerConfig, REQUEST_ID_HEADER};
