// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Miette diagnostics for `switchboard.toml` problems.
//!
//! Figment reports what went wrong; this module decides how an operator sees
//! it. Misspelled sections and keys get a "did you mean" hint, enum settings
//! such as `classifier.provider` list their allowed spellings, and each error
//! is pinned to its line when the TOML text is at hand.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use figment::error::Kind;
use miette::{Diagnostic, GraphicalReportHandler, NamedSource, SourceSpan};
use thiserror::Error;

/// Name under which an in-memory TOML string is reported.
pub const INLINE_SOURCE: &str = "<inline>";

/// Jaro-Winkler score a candidate must beat to be suggested.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// TOML text by display path, used to place spans.
pub type TomlSource = (String, String);

/// A configuration problem, ready to render.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A top-level table or key that no section matches.
    #[error("unknown section `[{section}]`")]
    #[diagnostic(
        code(switchboard::config::unknown_section),
        help("{}", hint(suggestion.as_deref(), "sections", sections))
    )]
    UnknownSection {
        section: String,
        suggestion: Option<String>,
        /// Every section the config accepts.
        sections: String,
        #[label("not a Switchboard section")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A key inside a known section that the section does not define.
    #[error("unknown key `{key}` in `[{section}]`")]
    #[diagnostic(
        code(switchboard::config::unknown_key),
        help("{}", hint(suggestion.as_deref(), "keys", valid_keys))
    )]
    UnknownKey {
        section: String,
        key: String,
        suggestion: Option<String>,
        valid_keys: String,
        #[label("not a key of this section")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// An enum setting with a value outside its allowed spellings.
    #[error("`{key}` does not accept `{found}`")]
    #[diagnostic(
        code(switchboard::config::invalid_choice),
        help("choose one of {allowed}")
    )]
    InvalidChoice {
        /// Dotted path, e.g. `classifier.provider`.
        key: String,
        found: String,
        /// Allowed values joined with `|`.
        allowed: String,
        #[label("unsupported value")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value of the wrong TOML type.
    #[error("`{key}` has the wrong type: found {found}")]
    #[diagnostic(code(switchboard::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        found: String,
        expected: String,
        #[label("wrong type here")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A well-typed value that breaks a semantic rule.
    #[error("validation error: {message}")]
    #[diagnostic(code(switchboard::config::validation))]
    Validation { message: String },

    /// Anything figment reports that has no dedicated rendering.
    #[error("configuration error: {0}")]
    #[diagnostic(code(switchboard::config::other))]
    Other(String),
}

fn hint(suggestion: Option<&str>, noun: &str, valid: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid {noun}: {valid}"),
        None => format!("valid {noun}: {valid}"),
    }
}

/// Maps every error inside a figment failure to a diagnostic.
pub fn from_figment(err: figment::Error, sources: &[TomlSource]) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| {
            let source = source_of(&error, sources);
            let path: Vec<&str> = error.path.iter().map(String::as_str).collect();
            match &error.kind {
                Kind::UnknownField(field, expected) => match path.first() {
                    None => {
                        let (span, src) =
                            pin(source, |text| locate_section(text, field), field.len());
                        ConfigError::UnknownSection {
                            section: field.clone(),
                            suggestion: suggest_key(field, expected),
                            sections: expected.join(", "),
                            span,
                            src,
                        }
                    }
                    Some(section) => {
                        let (span, src) = pin(
                            source,
                            |text| locate_key(text, Some(*section), field),
                            field.len(),
                        );
                        ConfigError::UnknownKey {
                            section: section.to_string(),
                            key: field.clone(),
                            suggestion: suggest_key(field, expected),
                            valid_keys: expected.join(", "),
                            span,
                            src,
                        }
                    }
                },
                Kind::UnknownVariant(found, allowed) => {
                    let (span, src) = pin_value(source, &path);
                    ConfigError::InvalidChoice {
                        key: path.join("."),
                        found: found.clone(),
                        allowed: allowed.join("|"),
                        span,
                        src,
                    }
                }
                Kind::InvalidType(actual, expected) => {
                    let (span, src) = pin_value(source, &path);
                    ConfigError::InvalidType {
                        key: path.join("."),
                        found: actual.to_string(),
                        expected: expected.clone(),
                        span,
                        src,
                    }
                }
                _ => ConfigError::Other(error.to_string()),
            }
        })
        .collect()
}

/// The TOML text an error came from: a file by path, or the inline string.
fn source_of<'a>(error: &figment::error::Error, sources: &'a [TomlSource]) -> Option<&'a TomlSource> {
    let wanted = match error.metadata.as_ref()?.source.as_ref()? {
        figment::Source::File(path) => path.display().to_string(),
        figment::Source::Code(_) => INLINE_SOURCE.to_string(),
        _ => return None,
    };
    sources.iter().find(|(name, _)| *name == wanted)
}

fn pin(
    source: Option<&TomlSource>,
    locate: impl FnOnce(&str) -> Option<usize>,
    len: usize,
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let Some((name, text)) = source else {
        return (None, None);
    };
    match locate(text) {
        Some(offset) => (
            Some(SourceSpan::new(offset.into(), len)),
            Some(NamedSource::new(name, text.clone())),
        ),
        None => (None, None),
    }
}

/// Pins a `section.key` path to its key.
fn pin_value(
    source: Option<&TomlSource>,
    path: &[&str],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    match path {
        [section, key] => pin(source, |text| locate_key(text, Some(*section), key), key.len()),
        [key] => pin(source, |text| locate_key(text, None, key), key.len()),
        _ => (None, None),
    }
}

/// Byte offset of `key` within `[section]`, or before any header when
/// `section` is `None`.
pub fn locate_key(content: &str, section: Option<&str>, key: &str) -> Option<usize> {
    let mut current: Option<&str> = None;
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if let Some(header) = table_name(trimmed) {
            current = Some(header);
        } else if current == section && key_name(trimmed) == Some(key) {
            return Some(offset + line.len() - trimmed.len());
        }
        offset += line.len();
    }
    None
}

/// Byte offset of the name in a `[section]` header, falling back to a
/// top-level `section = ...` key.
pub fn locate_section(content: &str, section: &str) -> Option<usize> {
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if table_name(trimmed) == Some(section) {
            let indent = line.len() - trimmed.len();
            let name_start = trimmed.find(section).unwrap_or(1);
            return Some(offset + indent + name_start);
        }
        offset += line.len();
    }
    locate_key(content, None, section)
}

fn table_name(line: &str) -> Option<&str> {
    let inner = line.strip_prefix('[')?.split(']').next()?;
    Some(inner.trim())
}

fn key_name(line: &str) -> Option<&str> {
    if line.starts_with('#') {
        return None;
    }
    let (key, _) = line.split_once('=')?;
    Some(key.trim().trim_matches('"'))
}

/// Closest valid name by Jaro-Winkler similarity, if any is close enough.
pub fn suggest_key(unknown: &str, valid: &[&str]) -> Option<String> {
    valid
        .iter()
        .map(|&candidate| (candidate, strsim::jaro_winkler(unknown, candidate)))
        .filter(|&(_, score)| score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(candidate, _)| candidate.to_string())
}

/// Renders diagnostics with miette's graphical handler.
pub fn render(errors: &[ConfigError]) -> String {
    let handler = GraphicalReportHandler::new();
    let mut out = String::new();
    for error in errors {
        if handler.render_report(&mut out, error as &dyn Diagnostic).is_err() {
            out.push_str(&format!("Error: {error}\n"));
        }
    }
    out
}

/// Writes [`render`]'s output to stderr.
pub fn render_errors(errors: &[ConfigError]) {
    eprint!("{}", render(errors));
}
