// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `switchboard classify` command implementation.

use std::process::ExitCode;

use switchboard_config::SwitchboardConfig;
use switchboard_core::ClassifyResponse;

use crate::engine::build_engine;
use crate::serve::init_tracing;

/// Classifies `message` and prints the decision or error record.
///
/// Exits with status 1 when the output is an error record.
pub async fn run_classify(config: SwitchboardConfig, message: &str) -> ExitCode {
    init_tracing(&config.service.log_level);

    let response = match build_engine(&config) {
        Ok(engine) => engine.respond(message).await,
        Err(e) => ClassifyResponse::Error(e.to_record()),
    };

    match serde_json::to_string_pretty(&response) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("error: failed to render response: {e}");
            return ExitCode::FAILURE;
        }
    }

    if response.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
