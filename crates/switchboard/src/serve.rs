// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `switchboard serve` command implementation.
//!
//! Builds the decision engine for the configured provider and serves it over
//! HTTP until Ctrl-C or SIGTERM.

use std::sync::Arc;

use switchboard_config::SwitchboardConfig;
use switchboard_core::SwitchboardError;
use switchboard_gateway::{start_server, GatewayState, ServerConfig};
use tracing::{info, warn};

use crate::engine::build_engine;

pub async fn run_serve(config: SwitchboardConfig) -> Result<(), SwitchboardError> {
    init_tracing(&config.service.log_level);

    info!(
        service = config.service.name.as_str(),
        provider = %config.classifier.provider,
        "starting switchboard serve"
    );

    let engine = Arc::new(build_engine(&config)?);

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        cors_permissive: config.server.cors_permissive,
    };
    start_server(&server_config, GatewayState::new(engine.clone()), shutdown_signal()).await?;

    if let Err(e) = engine.shutdown().await {
        warn!(error = %e, "provider shutdown failed");
    }

    info!("switchboard serve shutdown complete");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("shutdown signal received");
}

/// Initializes the tracing subscriber with the given log level.
///
/// Logs go to stderr so `classify` output on stdout stays machine-readable.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("switchboard={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
