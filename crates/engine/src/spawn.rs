// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker spawning.
//!
//! Ordering obligations: the meta file is written before any child
//! exists, the prompt travels by file, and a failed launch removes the
//! meta so a phantom worker never shows up in listings.

use crate::script::{self, ScriptSpec};
use crate::{worktree, EngineError};
use std::path::{Path, PathBuf};
use troupe_adapters::{open_terminal, process, Layout};
use troupe_core::{
    validate_agent_name, validate_artifact_id, validate_model, IdGen, ShortId, UuidIdGen,
    WorkerMeta, WorkerMode,
};
use troupe_store::{results, Config, StateRoot};

/// Arguments to a worker spawn, as they arrive from the RPC layer.
#[derive(Debug, Clone)]
pub struct SpawnRequest {
    pub directory: PathBuf,
    pub prompt: String,
    pub model: Option<String>,
    pub agent: Option<String>,
    pub task_id: Option<String>,
    pub mode: WorkerMode,
    pub isolate: bool,
    pub notify_session_id: Option<String>,
    /// Set when the worker is a pipeline step.
    pub pipeline_id: Option<String>,
}

/// What the caller gets back from a successful spawn.
#[derive(Debug, Clone)]
pub struct SpawnOutcome {
    pub task_id: String,
    /// Launch backend: a terminal name, or "background".
    pub backend: String,
    /// Interactive workers only: the child's short session id.
    pub session_id: Option<String>,
    pub workspace: PathBuf,
}

/// Spawn a worker per the request. See module docs for ordering.
pub async fn spawn_worker(
    root: &StateRoot,
    config: &Config,
    req: SpawnRequest,
) -> Result<SpawnOutcome, EngineError> {
    // Validation gate: everything dynamic in the launch is checked here.
    let model = match &req.model {
        Some(m) => validate_model(m)?.to_string(),
        None => config.spawn.default_model.clone(),
    };
    if let Some(agent) = &req.agent {
        validate_agent_name(agent)?;
        if !config.agent_allowed(agent) {
            return Err(EngineError::InvalidArgument(format!(
                "unknown agent {agent:?}"
            )));
        }
    }
    if !req.directory.is_dir() {
        return Err(EngineError::InvalidArgument(format!(
            "directory does not exist: {}",
            req.directory.display()
        )));
    }

    let task_id = resolve_task_id(root, req.task_id.as_deref())?;
    let paths = results::paths(root, &task_id);

    // Isolation worktree before anything is recorded; its failure aborts
    // the spawn with nothing to clean up.
    let workspace = if req.isolate {
        worktree::create(&req.directory, &task_id).await?
    } else {
        req.directory.clone()
    };

    // Interactive workers get a runtime session id and a hook settings
    // file so they register and drain like any other session.
    let session_uuid =
        matches!(req.mode, WorkerMode::Interactive).then(|| UuidIdGen.next());
    let settings_path = match (&req.mode, &session_uuid) {
        (WorkerMode::Interactive, Some(_)) => Some(
            troupe_hooks::settings::prepare_worker_settings(root, &task_id, &workspace)
                .map_err(|e| EngineError::SpawnFailed(e.to_string()))?,
        ),
        _ => None,
    };

    // Meta before spawn.
    let mut meta = WorkerMeta::new(
        &task_id,
        &workspace.display().to_string(),
        &req.prompt,
        &model,
        now_ms(),
    );
    meta.agent = req.agent.clone();
    meta.mode = req.mode;
    meta.notify_session_id = req.notify_session_id.clone();
    meta.session_id = session_uuid.as_deref().map(|u| u.short(8).to_string());
    meta.worktree_branch = req.isolate.then(|| format!("worker/{task_id}"));
    meta.pipeline_id = req.pipeline_id.clone();
    results::write_meta(root, &meta)?;

    troupe_store::fs::safe_write(&paths.prompt, req.prompt.as_bytes())?;

    let spec = ScriptSpec {
        task_id: &task_id,
        directory: &workspace,
        command: &config.spawn.command,
        model: &model,
        agent: req.agent.as_deref(),
        mode: req.mode,
        session_id: session_uuid.as_deref(),
        settings_path: settings_path.as_deref(),
    };
    let launch = script::build(&spec, &paths);

    let backend = match launch_child(&launch, &workspace, req.mode).await {
        Ok(backend) => backend,
        Err(e) => {
            // No phantom workers: a failed launch takes its meta with it.
            let _ = std::fs::remove_file(&paths.meta);
            let _ = std::fs::remove_file(&paths.prompt);
            return Err(e);
        }
    };

    tracing::info!(task_id, backend, mode = %req.mode, "worker spawned");
    Ok(SpawnOutcome {
        task_id,
        backend: backend.to_string(),
        session_id: meta.session_id,
        workspace,
    })
}

async fn launch_child(
    launch: &str,
    workspace: &Path,
    mode: WorkerMode,
) -> Result<&'static str, EngineError> {
    match mode {
        // Pipe workers are deaf and cheap: no pane, just a detached child.
        WorkerMode::Pipe => {
            process::spawn_detached(launch, workspace)?;
            Ok("background")
        }
        WorkerMode::Interactive => Ok(open_terminal(launch, workspace, Layout::Tab).await?),
    }
}

fn resolve_task_id(root: &StateRoot, requested: Option<&str>) -> Result<String, EngineError> {
    match requested {
        Some(id) => {
            let id = validate_artifact_id(id)?;
            if results::paths(root, id).meta.exists() {
                return Err(EngineError::Conflict(format!(
                    "task id {id:?} already exists"
                )));
            }
            Ok(id.to_string())
        }
        None => {
            // Generated ids: short uuid prefix, re-rolled on collision.
            loop {
                let raw = UuidIdGen.next();
                let id = format!("w-{}", raw.short(8));
                if !results::paths(root, &id).meta.exists() {
                    return Ok(id);
                }
            }
        }
    }
}

pub(crate) fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "spawn_tests.rs"]
mod tests;
