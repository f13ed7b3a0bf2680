// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Spawn isolation via git worktrees.
//!
//! An isolated worker gets its own checkout on branch
//! `worker/<task_id>`; file conflicts with the lead are avoided by
//! construction and the lead merges after review. Worktree creation
//! failure is fatal to the spawn.

use crate::EngineError;
use std::path::{Path, PathBuf};
use troupe_adapters::subprocess::{run_with_timeout, GIT_WORKTREE_TIMEOUT};
use tokio::process::Command;

/// Create the isolation worktree for a task inside `directory`'s repo.
///
/// The checkout lands in `<directory>/.troupe-worktrees/<task_id>` on a
/// fresh branch `worker/<task_id>`. Returns the worktree path.
pub async fn create(directory: &Path, task_id: &str) -> Result<PathBuf, EngineError> {
    let worktree = directory.join(".troupe-worktrees").join(task_id);
    let branch = format!("worker/{task_id}");

    let mut cmd = Command::new("git");
    cmd.current_dir(directory)
        .arg("worktree")
        .arg("add")
        .arg("-b")
        .arg(&branch)
        .arg(&worktree);

    let output = run_with_timeout(cmd, GIT_WORKTREE_TIMEOUT, "git worktree add")
        .await
        .map_err(EngineError::SpawnFailed)?;

    if !output.status.success() {
        return Err(EngineError::SpawnFailed(format!(
            "git worktree add {branch}: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(worktree)
}

#[cfg(test)]
#[path = "worktree_tests.rs"]
mod tests;
