// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inbox messages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Message priority. Urgent messages are produced by wake fallbacks and
/// explicit urgent sends; drains render the priority so the model sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    #[default]
    Normal,
    Urgent,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Normal => write!(f, "normal"),
            Priority::Urgent => write!(f, "urgent"),
        }
    }
}

/// One line of an `inbox/<short_id>.jsonl` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboxMessage {
    pub ts: u64,
    pub from: String,
    #[serde(default)]
    pub priority: Priority,
    pub content: String,
}

impl InboxMessage {
    pub fn new(from: impl Into<String>, content: impl Into<String>, ts: u64) -> Self {
        Self {
            ts,
            from: from.into(),
            priority: Priority::Normal,
            content: content.into(),
        }
    }

    pub fn urgent(from: impl Into<String>, content: impl Into<String>, ts: u64) -> Self {
        Self {
            priority: Priority::Urgent,
            ..Self::new(from, content, ts)
        }
    }
}
