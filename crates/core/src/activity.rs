// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Activity log events.

use serde::{Deserialize, Serialize};

/// One line of `activity.jsonl`: a single tool invocation by a session.
///
/// The log is the total order of tool events across all sessions; the
/// per-session records are bounded summaries derived from the same hook
/// invocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub ts: u64,
    /// Short session id.
    pub session: String,
    pub tool: String,
    /// File argument for Edit/Write tools.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Path argument for tools that take one (e.g. Read).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
}
