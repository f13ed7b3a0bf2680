// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline execution.
//!
//! Steps run strictly in sequence: each spawns as a pipe worker, the
//! driver blocks on its done marker, and a failure halts everything
//! after it. The driver runs on its own task; the RPC that started the
//! pipeline returned long ago. Step workers may reference the previous
//! step's result file at `results/<pipeline_id>-<n>-<name>.txt` by
//! convention.

use crate::spawn::{now_ms, spawn_worker, SpawnRequest};
use crate::{result, EngineError};
use std::path::PathBuf;
use std::time::Duration;
use troupe_core::{
    validate_artifact_id, IdGen, PipelineMeta, PipelineStatus, ShortId, StepSpec, StepStatus,
    UuidIdGen, WorkerMode, WorkerStatus,
};
use troupe_store::{fs as store_fs, results, Config, StateRoot};

/// Poll interval while waiting on a step's done marker
/// (`TROUPE_PIPELINE_POLL_MS`, default 500).
fn poll_interval() -> Duration {
    let ms = std::env::var("TROUPE_PIPELINE_POLL_MS")
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(500);
    Duration::from_millis(ms)
}

/// Validate and record a pipeline, returning its meta. The caller
/// decides how to drive it (the coordinator spawns [`drive`] on a task).
pub fn prepare(
    root: &StateRoot,
    steps: &[StepSpec],
    directory: &std::path::Path,
    pipeline_id: Option<&str>,
) -> Result<PipelineMeta, EngineError> {
    if steps.is_empty() {
        return Err(EngineError::InvalidArgument("pipeline has no steps".into()));
    }
    for step in steps {
        validate_artifact_id(&step.name)?;
        if step.prompt.is_empty() {
            return Err(EngineError::InvalidArgument(format!(
                "step {:?} has an empty prompt",
                step.name
            )));
        }
    }
    if !directory.is_dir() {
        return Err(EngineError::InvalidArgument(format!(
            "directory does not exist: {}",
            directory.display()
        )));
    }

    let pipeline_id = match pipeline_id {
        Some(id) => {
            let id = validate_artifact_id(id)?;
            if results::paths(root, id).meta.exists() {
                return Err(EngineError::Conflict(format!(
                    "pipeline id {id:?} already exists"
                )));
            }
            id.to_string()
        }
        None => loop {
            let raw = UuidIdGen.next();
            let id = format!("p-{}", raw.short(8));
            if !results::paths(root, &id).meta.exists() {
                break id;
            }
        },
    };

    let meta = PipelineMeta::new(&pipeline_id, &directory.display().to_string(), steps, now_ms());
    results::write_pipeline_meta(root, &meta)?;
    log_line(root, &pipeline_id, &format!("pipeline {pipeline_id} created with {} steps", steps.len()));
    Ok(meta)
}

/// Drive a prepared pipeline to completion. Blocking (on markers, not
/// children); run it on a dedicated task.
pub async fn drive(
    root: &StateRoot,
    config: &Config,
    mut meta: PipelineMeta,
    steps: Vec<StepSpec>,
) -> Result<PipelineMeta, EngineError> {
    let pipeline_id = meta.pipeline_id.clone();
    let mut failed = false;

    for (index, step) in steps.iter().enumerate() {
        if failed {
            meta.steps[index].status = StepStatus::Skipped;
            results::write_pipeline_meta(root, &meta)?;
            continue;
        }

        let task_id = meta.steps[index].task_id.clone();
        let directory = step
            .directory
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(&meta.directory));

        log_line(root, &pipeline_id, &format!("step {} ({task_id}) starting", step.name));
        meta.steps[index].status = StepStatus::Running;
        results::write_pipeline_meta(root, &meta)?;

        let spawned = spawn_worker(
            root,
            config,
            SpawnRequest {
                directory,
                prompt: step.prompt.clone(),
                model: None,
                agent: None,
                task_id: Some(task_id.clone()),
                mode: WorkerMode::Pipe,
                isolate: false,
                notify_session_id: None,
                pipeline_id: Some(pipeline_id.clone()),
            },
        )
        .await;

        let status = match spawned {
            Ok(_) => wait_for_step(root, &task_id).await?,
            Err(e) => {
                log_line(root, &pipeline_id, &format!("step {} spawn failed: {e}", step.name));
                WorkerStatus::Failed
            }
        };

        meta.steps[index].status = StepStatus::from(status);
        log_line(
            root,
            &pipeline_id,
            &format!("step {} finished: {}", step.name, meta.steps[index].status),
        );
        if meta.steps[index].status != StepStatus::Completed {
            failed = true;
        }
        results::write_pipeline_meta(root, &meta)?;
    }

    meta.status = if failed {
        PipelineStatus::Failed
    } else {
        PipelineStatus::Completed
    };
    meta.finished = Some(now_ms());
    results::write_pipeline_meta(root, &meta)?;
    write_done_marker(root, &meta)?;
    log_line(root, &pipeline_id, &format!("pipeline {}: {}", pipeline_id, meta.status));
    Ok(meta)
}

/// Block until a step's worker leaves `Running`.
///
/// Freshly-spawned children take a moment to write their pid file, so
/// `Unknown` only counts once the startup grace has elapsed; after
/// that it means the child died without its trailer.
async fn wait_for_step(root: &StateRoot, task_id: &str) -> Result<WorkerStatus, EngineError> {
    let grace = startup_grace();
    let interval = poll_interval();
    let started = std::time::Instant::now();
    loop {
        let (status, _) = result::probe_status(root, task_id)?;
        match status {
            WorkerStatus::Running => {}
            WorkerStatus::Unknown if started.elapsed() < grace => {}
            other => return Ok(other),
        }
        tokio::time::sleep(interval).await;
    }
}

/// Startup grace before `Unknown` is believed
/// (`TROUPE_STEP_GRACE_MS`, default 10000).
fn startup_grace() -> Duration {
    let ms = std::env::var("TROUPE_STEP_GRACE_MS")
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(10_000);
    Duration::from_millis(ms)
}

/// Aggregate done marker, same shape as a worker's.
fn write_done_marker(root: &StateRoot, meta: &PipelineMeta) -> Result<(), EngineError> {
    let done = troupe_core::WorkerDone {
        status: match meta.status {
            PipelineStatus::Completed => WorkerStatus::Completed,
            _ => WorkerStatus::Failed,
        },
        finished: now_ms() / 1000,
        task_id: meta.pipeline_id.clone(),
        exit_code: None,
    };
    store_fs::safe_write_json(&results::paths(root, &meta.pipeline_id).done, &done)?;
    Ok(())
}

fn log_line(root: &StateRoot, pipeline_id: &str, message: &str) {
    let line = format!("{} {}", now_ms(), message);
    if let Err(e) = store_fs::append_line(&results::paths(root, pipeline_id).log, line.as_bytes()) {
        tracing::warn!(pipeline_id, error = %e, "pipeline log append failed");
    }
}

/// Aggregate status for `coord_get_pipeline`.
pub fn pipeline_report(root: &StateRoot, pipeline_id: &str) -> Result<PipelineMeta, EngineError> {
    let pipeline_id = validate_artifact_id(pipeline_id)?;
    results::read_pipeline_meta(root, pipeline_id)?
        .ok_or_else(|| EngineError::NotFound(format!("pipeline {pipeline_id:?}")))
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
