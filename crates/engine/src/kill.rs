// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker termination.

use crate::EngineError;
use troupe_adapters::process;
use troupe_core::validate_artifact_id;
use troupe_store::{results, StateRoot};

/// Kill a worker's process tree via its pid file.
///
/// Returns whether the process was alive. A worker that already
/// finished (or never recorded a pid) is a well-formed "not alive"
/// result, not an error.
pub fn kill_worker(root: &StateRoot, task_id: &str) -> Result<bool, EngineError> {
    let task_id = validate_artifact_id(task_id)?;
    if results::read_meta(root, task_id)?.is_none() {
        return Err(EngineError::NotFound(format!("worker {task_id:?}")));
    }

    let Some(pid) = results::read_pid(root, task_id)? else {
        return Ok(false);
    };
    let was_alive = process::kill_tree(pid)?;
    tracing::info!(task_id, pid, was_alive, "kill requested");
    Ok(was_alive)
}

#[cfg(test)]
#[path = "kill_tests.rs"]
mod tests;
