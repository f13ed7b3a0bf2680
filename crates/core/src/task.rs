// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task board records.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Blocked,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::InProgress => write!(f, "in_progress"),
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Blocked => write!(f, "blocked"),
        }
    }
}

/// `tasks/<task_id>.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    /// Ids of tasks that must complete before this one. Kept acyclic.
    #[serde(default)]
    pub blocked_by: Vec<String>,
    pub created: u64,
    pub updated: u64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TaskRecord {
    pub fn new(id: &str, subject: &str, now: u64) -> Self {
        Self {
            id: id.to_string(),
            subject: subject.to_string(),
            assignee: None,
            status: TaskStatus::Pending,
            blocked_by: Vec::new(),
            created: now,
            updated: now,
            extra: serde_json::Map::new(),
        }
    }
}

/// Whether setting `task_id.blocked_by = new_blocked_by` would create a
/// dependency cycle, given every other task's current edges.
///
/// Walks reachability from each proposed blocker; if `task_id` is
/// reachable, accepting the edge would close a loop.
pub fn would_create_cycle(
    tasks: &HashMap<String, TaskRecord>,
    task_id: &str,
    new_blocked_by: &[String],
) -> bool {
    let mut stack: Vec<&str> = new_blocked_by.iter().map(String::as_str).collect();
    let mut seen: HashSet<&str> = HashSet::new();

    while let Some(current) = stack.pop() {
        if current == task_id {
            return true;
        }
        if !seen.insert(current) {
            continue;
        }
        if let Some(task) = tasks.get(current) {
            stack.extend(task.blocked_by.iter().map(String::as_str));
        }
    }
    false
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
