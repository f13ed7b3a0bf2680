// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker status probing and result reporting.

use crate::EngineError;
use troupe_adapters::process;
use troupe_core::{validate_artifact_id, WorkerStatus};
use troupe_store::{results, StateRoot};

/// A worker's status plus the tail of its output.
#[derive(Debug, Clone)]
pub struct WorkerReport {
    pub task_id: String,
    pub status: WorkerStatus,
    pub tail: String,
    pub exit_code: Option<i32>,
}

/// Probe a worker's status: done marker first, then pid liveness.
///
/// No done marker and no live pid means the child died without its
/// trailer (crash, SIGKILL); that is `Unknown`, not `Failed`; there is
/// no exit status to trust.
pub fn probe_status(root: &StateRoot, task_id: &str) -> Result<(WorkerStatus, Option<i32>), EngineError> {
    if let Some(done) = results::read_done(root, task_id)? {
        return Ok((done.status, done.exit_code));
    }
    match results::read_pid(root, task_id)? {
        Some(pid) if process::is_alive(pid) => Ok((WorkerStatus::Running, None)),
        _ => Ok((WorkerStatus::Unknown, None)),
    }
}

/// Full report for `coord_get_result`.
pub fn worker_report(
    root: &StateRoot,
    task_id: &str,
    tail_lines: usize,
) -> Result<WorkerReport, EngineError> {
    let task_id = validate_artifact_id(task_id)?;
    if results::read_meta(root, task_id)?.is_none() {
        return Err(EngineError::NotFound(format!("worker {task_id:?}")));
    }
    let (status, exit_code) = probe_status(root, task_id)?;
    let tail = results::tail_output(root, task_id, tail_lines)?;
    Ok(WorkerReport {
        task_id: task_id.to_string(),
        status,
        tail,
        exit_code,
    })
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
