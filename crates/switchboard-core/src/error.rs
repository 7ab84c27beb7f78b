// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Switchboard decision engine.

use serde::Serialize;
use strum::{Display, EnumString};
use thiserror::Error;

/// Why the external classification capability could not produce a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AdapterFailureKind {
    /// Connection refused, DNS failure, TLS error, or any other transport error.
    Unreachable,
    /// The call did not complete within the configured timeout.
    Timeout,
    /// The capability answered with an error status (rate limit, server error, bad request).
    Upstream,
    /// The capability answered, but the content is not a JSON object.
    Undecodable,
}

impl AdapterFailureKind {
    /// Whether a retry policy may re-issue the call after this failure.
    pub fn is_transient(self) -> bool {
        matches!(self, Self::Unreachable | Self::Timeout | Self::Upstream)
    }
}

/// The primary error type used across the engine, providers and transports.
#[derive(Debug, Error)]
pub enum SwitchboardError {
    /// Configuration errors (invalid TOML, missing credentials, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// The inbound message is unusable (empty or whitespace only).
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// The classification capability was unreachable, timed out, or returned
    /// content that could not be decoded into a structured payload.
    #[error("classifier adapter failure ({kind}): {message}")]
    Adapter {
        kind: AdapterFailureKind,
        message: String,
        /// Undecoded output from the capability, kept for diagnostics.
        raw_output: Option<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The decoded payload broke a rule that cannot be repaired.
    #[error("classifier output failed validation on [{}]: {message}", fields.join(", "))]
    Validation {
        /// Offending field names, in schema order.
        fields: Vec<String>,
        message: String,
    },

    /// An internal-consistency violation such as an unroutable decision.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SwitchboardError {
    /// Shorthand for an adapter failure without a raw payload or source.
    pub fn adapter(kind: AdapterFailureKind, message: impl Into<String>) -> Self {
        Self::Adapter {
            kind,
            message: message.into(),
            raw_output: None,
            source: None,
        }
    }

    /// Adapter failure for content that is not a JSON object.
    pub fn undecodable(raw_output: impl Into<String>) -> Self {
        Self::Adapter {
            kind: AdapterFailureKind::Undecodable,
            message: "model did not return valid JSON".to_string(),
            raw_output: Some(raw_output.into()),
            source: None,
        }
    }

    /// Returns the adapter failure kind, if this is an adapter failure.
    pub fn adapter_kind(&self) -> Option<AdapterFailureKind> {
        match self {
            Self::Adapter { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Converts the error into the record returned to callers.
    ///
    /// Source chains are flattened into the message; nothing else leaks.
    pub fn to_record(&self) -> ErrorRecord {
        match self {
            Self::Config(message) => ErrorRecord {
                error: format!("configuration error: {message}"),
                kind: ErrorKind::Config,
                failure: None,
                raw_output: None,
                fields: None,
            },
            Self::InvalidMessage(message) => ErrorRecord {
                error: message.clone(),
                kind: ErrorKind::InvalidMessage,
                failure: None,
                raw_output: None,
                fields: None,
            },
            Self::Adapter {
                kind,
                message,
                raw_output,
                ..
            } => ErrorRecord {
                error: message.clone(),
                kind: ErrorKind::AdapterFailure,
                failure: Some(*kind),
                raw_output: raw_output.clone(),
                fields: None,
            },
            Self::Validation { fields, message } => ErrorRecord {
                error: message.clone(),
                kind: ErrorKind::ValidationFailure,
                failure: None,
                raw_output: None,
                fields: Some(fields.clone()),
            },
            Self::Internal(message) => ErrorRecord {
                error: message.clone(),
                kind: ErrorKind::Internal,
                failure: None,
                raw_output: None,
                fields: None,
            },
        }
    }
}

/// Category of an [`ErrorRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Config,
    InvalidMessage,
    AdapterFailure,
    ValidationFailure,
    Internal,
}

/// Structured error returned in place of a decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorRecord {
    /// Human-readable description.
    pub error: String,
    pub kind: ErrorKind,
    /// Adapter failure detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<AdapterFailureKind>,
    /// Raw capability output that could not be decoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_output: Option<String>,
    /// Fields that failed validation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
}
