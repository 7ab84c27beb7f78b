// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Switchboard configuration: `switchboard.toml` plus `SWITCHBOARD_*` overrides.
//!
//! Each `load_and_validate*` entry point either returns a config that passed
//! semantic validation or every problem found, as miette diagnostics.
//!
//! ```no_run
//! let config = switchboard_config::load_and_validate().unwrap_or_else(|errors| {
//!     switchboard_config::render_errors(&errors);
//!     std::process::exit(2);
//! });
//! println!("classifier: {}", config.classifier.provider);
//! ```

use std::path::{Path, PathBuf};

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{render, render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{ProviderKind, SwitchboardConfig};

use diagnostic::{TomlSource, INLINE_SOURCE};

/// Loads the file hierarchy and environment, then validates.
pub fn load_and_validate() -> Result<SwitchboardConfig, Vec<ConfigError>> {
    finish(loader::load_config(), hierarchy_sources)
}

/// Loads one explicit file (plus environment), then validates.
pub fn load_and_validate_path(path: &Path) -> Result<SwitchboardConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path), || {
        read_source(path.to_path_buf()).into_iter().collect()
    })
}

/// Loads a TOML string with no files and no environment, then validates.
pub fn load_and_validate_str(toml: &str) -> Result<SwitchboardConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml), || {
        vec![(INLINE_SOURCE.to_string(), toml.to_string())]
    })
}

/// Sources are only read when extraction failed and spans are needed.
fn finish(
    loaded: Result<SwitchboardConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<TomlSource>,
) -> Result<SwitchboardConfig, Vec<ConfigError>> {
    let config = loaded.map_err(|err| diagnostic::from_figment(err, &sources()))?;
    validation::validate_config(&config)?;
    Ok(config)
}

fn hierarchy_sources() -> Vec<TomlSource> {
    let local = std::env::current_dir()
        .map(|dir| dir.join(loader::LOCAL_CONFIG))
        .unwrap_or_else(|_| PathBuf::from(loader::LOCAL_CONFIG));
    [
        Some(local),
        loader::user_config_path(),
        Some(PathBuf::from(loader::SYSTEM_CONFIG)),
    ]
    .into_iter()
    .flatten()
    .filter_map(read_source)
    .collect()
}

fn read_source(path: PathBuf) -> Option<TomlSource> {
    let content = std::fs::read_to_string(&path).ok()?;
    Some((path.display().to_string(), content))
}
