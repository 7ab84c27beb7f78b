// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider trait for text-classification capabilities (hosted model, local
//! model, rule-based classifier).

use async_trait::async_trait;

use crate::error::SwitchboardError;
use crate::policy::PolicySpec;
use crate::traits::adapter::PluginAdapter;

/// A capability that maps message text to an untrusted classification payload.
///
/// Implementations make at most one outbound call per invocation and must be
/// idempotent, so callers may wrap them in a retry policy. The returned text
/// is expected to be a JSON object shaped like [`PolicySpec::output_schema`]
/// but is validated downstream and never trusted.
#[async_trait]
pub trait ClassifierProvider: PluginAdapter {
    /// Classifies `text` under `policy` and returns the raw payload.
    ///
    /// Transport and upstream problems are reported as
    /// [`SwitchboardError::Adapter`].
    async fn predict(&self, text: &str, policy: &PolicySpec) -> Result<String, SwitchboardError>;
}
