// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker artifact records.
//!
//! A worker leaves a family of files under `results/` keyed by its task
//! id. The meta file is written by the supervisor before the child is
//! spawned; the pid, output, and done marker are owned by the child.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of the prompt excerpt stored in the meta file. The
/// full prompt lives in `<id>.prompt`.
pub const PROMPT_EXCERPT_MAX: usize = 500;

/// How a worker is run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerMode {
    /// Fire-and-forget: prompt in, result file out, deaf to messages.
    #[default]
    Pipe,
    /// Full hook set installed; registers, heartbeats, drains an inbox,
    /// and can be directed mid-run.
    Interactive,
}

impl fmt::Display for WorkerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerMode::Pipe => write!(f, "pipe"),
            WorkerMode::Interactive => write!(f, "interactive"),
        }
    }
}

/// Worker status as probed from its artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerStatus {
    Running,
    Completed,
    Failed,
    /// No done marker and no live pid: the child crashed or was killed
    /// before its trailer ran.
    Unknown,
}

impl fmt::Display for WorkerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerStatus::Running => write!(f, "running"),
            WorkerStatus::Completed => write!(f, "completed"),
            WorkerStatus::Failed => write!(f, "failed"),
            WorkerStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// `<id>.meta.json`: spawn metadata, written before the child exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerMeta {
    pub task_id: String,
    pub directory: String,
    /// First [`PROMPT_EXCERPT_MAX`] chars of the prompt.
    pub prompt: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    #[serde(default)]
    pub mode: WorkerMode,
    /// Epoch ms at spawn.
    pub spawned: u64,
    /// Session entitled to the completion notification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_session_id: Option<String>,
    /// Runtime session id assigned to an interactive worker; directives
    /// are routed to its short form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub status: WorkerStatus,
    /// Set when the worker runs in an isolation worktree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worktree_branch: Option<String>,
    /// Pipeline that owns this worker, when it is a pipeline step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl WorkerMeta {
    pub fn new(task_id: &str, directory: &str, prompt: &str, model: &str, spawned: u64) -> Self {
        Self {
            task_id: task_id.to_string(),
            directory: directory.to_string(),
            prompt: excerpt(prompt),
            model: model.to_string(),
            agent: None,
            mode: WorkerMode::Pipe,
            spawned,
            notify_session_id: None,
            session_id: None,
            status: WorkerStatus::Running,
            worktree_branch: None,
            pipeline_id: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// Truncate a prompt to its stored excerpt on a char boundary.
pub fn excerpt(prompt: &str) -> String {
    if prompt.len() <= PROMPT_EXCERPT_MAX {
        return prompt.to_string();
    }
    let mut end = PROMPT_EXCERPT_MAX;
    while !prompt.is_char_boundary(end) {
        end -= 1;
    }
    prompt[..end].to_string()
}

/// `<id>.meta.json.done`: written atomically by the child's exit trailer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerDone {
    pub status: WorkerStatus,
    /// Epoch seconds at exit (written by the shell trailer).
    pub finished: u64,
    pub task_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
