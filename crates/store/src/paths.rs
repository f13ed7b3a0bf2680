// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! State root layout.
//!
//! ```text
//! <root>/terminals/
//!   session-<short_id>.json
//!   activity.jsonl
//!   inbox/<short_id>.jsonl
//!   results/<task_id>.*
//!   tasks/<task_id>.json
//!   teams/<name>.json
//!   rate-limits/<sender>.json
//! ```
//!
//! Identifiers are validated before they reach any of the path builders
//! here; the builders themselves only join onto fixed directories.

use crate::fs::ensure_dir;
use crate::StoreError;
use std::path::{Path, PathBuf};

/// The coordination state root (`<root>/terminals`).
#[derive(Debug, Clone)]
pub struct StateRoot {
    base: PathBuf,
}

impl StateRoot {
    /// Resolve the root from `TROUPE_STATE_DIR`, falling back to the
    /// platform state dir (`~/.local/state/troupe` on Linux), and
    /// create the layout.
    pub fn discover() -> Result<Self, StoreError> {
        if let Some(state_dir) = std::env::var_os("TROUPE_STATE_DIR") {
            return Self::open(PathBuf::from(state_dir));
        }
        let state_dir = dirs::state_dir()
            .map(|d| d.join("troupe"))
            .or_else(|| dirs::home_dir().map(|h| h.join(".local/state/troupe")))
            .ok_or_else(|| StoreError::BadRoot("no home directory".to_string()))?;
        Self::open(state_dir)
    }

    /// Open (creating if needed) the layout under an explicit state dir.
    pub fn open(state_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let state_dir = state_dir.into();
        if state_dir.as_os_str().is_empty() {
            return Err(StoreError::BadRoot("empty state dir".to_string()));
        }
        let base = state_dir.join("terminals");
        ensure_dir(&base)?;
        ensure_dir(&base.join("inbox"))?;
        ensure_dir(&base.join("results"))?;
        ensure_dir(&base.join("tasks"))?;
        ensure_dir(&base.join("teams"))?;
        ensure_dir(&base.join("rate-limits"))?;
        Ok(Self { base })
    }

    pub fn dir(&self) -> &Path {
        &self.base
    }

    /// Parent of `terminals/`, where the coordinator log and generated
    /// agent settings live.
    pub fn state_dir(&self) -> &Path {
        self.base.parent().unwrap_or(&self.base)
    }

    pub fn session_path(&self, short_id: &str) -> PathBuf {
        self.base.join(format!("session-{short_id}.json"))
    }

    pub fn activity_path(&self) -> PathBuf {
        self.base.join("activity.jsonl")
    }

    pub fn inbox_path(&self, short_id: &str) -> PathBuf {
        self.base.join("inbox").join(format!("{short_id}.jsonl"))
    }

    pub fn results_dir(&self) -> PathBuf {
        self.base.join("results")
    }

    pub fn task_path(&self, task_id: &str) -> PathBuf {
        self.base.join("tasks").join(format!("{task_id}.json"))
    }

    pub fn tasks_dir(&self) -> PathBuf {
        self.base.join("tasks")
    }

    pub fn team_path(&self, name: &str) -> PathBuf {
        self.base.join("teams").join(format!("{name}.json"))
    }

    pub fn teams_dir(&self) -> PathBuf {
        self.base.join("teams")
    }

    pub fn rate_limit_path(&self, sender: &str) -> PathBuf {
        self.base
            .join("rate-limits")
            .join(format!("{sender}.json"))
    }

    pub fn config_path(&self) -> PathBuf {
        self.base.join("config.toml")
    }
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
