// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session records.
//!
//! One JSON file per live coding session, maintained by that session's
//! hooks and read by everything else. The record is a bounded activity
//! summary, not a log; the activity log carries the full stream.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Maximum entries in `files_touched` (LRU-evicted beyond this).
pub const FILES_TOUCHED_CAP: usize = 30;

/// Maximum entries in `recent_ops` (newest-first, truncated beyond this).
pub const RECENT_OPS_CAP: usize = 10;

/// A session older than this (by `last_active`) is stale.
pub const STALE_AFTER_MS: u64 = 60 * 60 * 1000;

/// Lifecycle status of a session record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Hooks are firing; the session is live.
    Active,
    /// No activity for over an hour; revived by the next heartbeat.
    Stale,
    /// Session ended or was purged. Terminal.
    Closed,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Active => write!(f, "active"),
            SessionStatus::Stale => write!(f, "stale"),
            SessionStatus::Closed => write!(f, "closed"),
        }
    }
}

/// One recent tool invocation, kept newest-first in the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentOp {
    pub ts: u64,
    pub tool: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

/// A session record: `session-<short_id>.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Short id (8 chars of the runtime-assigned session id).
    pub session: String,
    /// Controlling terminal device, when detectable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tty: Option<String>,
    /// Project name (working directory basename).
    #[serde(default)]
    pub project: String,
    /// Git branch at registration, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    pub cwd: String,
    /// Epoch ms when the session registered.
    pub started: u64,
    /// Epoch ms of the last recorded activity.
    pub last_active: u64,
    pub status: SessionStatus,
    /// Tool name → invocation count. Monotonically non-decreasing.
    #[serde(default)]
    pub tool_counts: HashMap<String, u64>,
    /// Files edited or written, deduplicated, most-recent last, capped.
    #[serde(default)]
    pub files_touched: Vec<String>,
    /// Most recent operations, newest first, capped.
    #[serde(default)]
    pub recent_ops: Vec<RecentOp>,
    /// Set when the inbox has undrained messages.
    #[serde(default)]
    pub has_messages: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_file: Option<String>,
    /// Fields written by policy layers are carried through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SessionRecord {
    /// Fresh record for a newly-registered session.
    pub fn new(short_id: &str, cwd: &str, now: u64) -> Self {
        Self {
            session: short_id.to_string(),
            tty: None,
            project: project_name(cwd),
            branch: None,
            cwd: cwd.to_string(),
            started: now,
            last_active: now,
            status: SessionStatus::Active,
            tool_counts: HashMap::new(),
            files_touched: Vec::new(),
            recent_ops: Vec::new(),
            has_messages: false,
            plan_file: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Apply one tool invocation to the activity summary.
    ///
    /// Counts always increment; `Edit`/`Write` with a file path also
    /// update `files_touched` (dedup + LRU cap) and a `recent_ops` entry
    /// is prepended (capped).
    pub fn record_tool(&mut self, tool: &str, file: Option<&str>, now: u64) {
        *self.tool_counts.entry(tool.to_string()).or_insert(0) += 1;

        if let Some(file) = file {
            if matches!(tool, "Edit" | "Write") {
                self.touch_file(file);
            }
        }

        self.recent_ops.insert(
            0,
            RecentOp {
                ts: now,
                tool: tool.to_string(),
                file: file.map(str::to_string),
            },
        );
        self.recent_ops.truncate(RECENT_OPS_CAP);

        self.last_active = now;
        if self.status == SessionStatus::Stale {
            self.status = SessionStatus::Active;
        }
    }

    fn touch_file(&mut self, file: &str) {
        self.files_touched.retain(|f| f != file);
        self.files_touched.push(file.to_string());
        if self.files_touched.len() > FILES_TOUCHED_CAP {
            let excess = self.files_touched.len() - FILES_TOUCHED_CAP;
            self.files_touched.drain(..excess);
        }
    }

    /// Status as seen by an observer at `now`: an `active` record past the
    /// staleness horizon reads as `stale`.
    pub fn effective_status(&self, now: u64) -> SessionStatus {
        if self.status == SessionStatus::Active
            && now.saturating_sub(self.last_active) > STALE_AFTER_MS
        {
            SessionStatus::Stale
        } else {
            self.status
        }
    }

    /// Total tool invocations recorded.
    pub fn total_tool_count(&self) -> u64 {
        self.tool_counts.values().sum()
    }
}

/// Project name shown in listings: the working directory's basename.
pub fn project_name(cwd: &str) -> String {
    std::path::Path::new(cwd)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| cwd.to_string())
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
