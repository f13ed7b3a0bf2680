// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker tools: terminals, spawn, results, kill, directives.

use crate::error::{CoordError, ErrorKind};
use crate::server::Ctx;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::time::Duration;
use troupe_adapters::{open_terminal, Layout};
use troupe_core::{validate_artifact_id, InboxMessage, Priority, WorkerMode};
use troupe_engine::{kill_worker, spawn_worker, worker_report, SpawnRequest};
use troupe_store::{inbox, results, sessions};

/// A directive's target counts as idle when its last activity is older
/// than this; idle targets get a wake keystroke after the append.
const DIRECTIVE_IDLE_AFTER_MS: u64 = 10_000;

fn parse_layout(value: Option<&str>) -> Result<Layout, CoordError> {
    match value {
        None => Ok(Layout::Tab),
        Some(v) => {
            Layout::parse(v).ok_or_else(|| CoordError::invalid(format!("unknown layout {v:?}")))
        }
    }
}

fn parse_mode(value: Option<&str>) -> Result<WorkerMode, CoordError> {
    match value {
        None | Some("pipe") => Ok(WorkerMode::Pipe),
        Some("interactive") => Ok(WorkerMode::Interactive),
        Some(other) => Err(CoordError::invalid(format!("unknown mode {other:?}"))),
    }
}

#[derive(Debug, Deserialize)]
pub struct SpawnTerminalArgs {
    pub directory: String,
    #[serde(default)]
    pub layout: Option<String>,
}

pub async fn spawn_terminal(ctx: &Ctx, args: SpawnTerminalArgs) -> Result<Value, CoordError> {
    let dir = PathBuf::from(&args.directory);
    if !dir.is_dir() {
        return Err(CoordError::invalid(format!(
            "directory does not exist: {}",
            args.directory
        )));
    }
    let layout = parse_layout(args.layout.as_deref())?;

    let backend = open_terminal(&ctx.config.spawn.command, &dir, layout)
        .await
        .map_err(|e| CoordError::new(ErrorKind::SpawnFailed, e.to_string()))?;
    Ok(json!({ "backend": backend }))
}

#[derive(Debug, Deserialize)]
pub struct SpawnWorkerArgs {
    pub directory: String,
    pub prompt: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub agent: Option<String>,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub isolate: bool,
    #[serde(default)]
    pub notify_session_id: Option<String>,
}

pub async fn spawn(ctx: &Ctx, args: SpawnWorkerArgs) -> Result<Value, CoordError> {
    let mode = parse_mode(args.mode.as_deref())?;
    let notify = match &args.notify_session_id {
        Some(id) => Some(troupe_core::short_session_id(id)?.to_string()),
        None => None,
    };

    let outcome = spawn_worker(
        &ctx.root,
        &ctx.config,
        SpawnRequest {
            directory: PathBuf::from(&args.directory),
            prompt: args.prompt,
            model: args.model,
            agent: args.agent,
            task_id: args.task_id,
            mode,
            isolate: args.isolate,
            notify_session_id: notify,
            pipeline_id: None,
        },
    )
    .await?;

    Ok(json!({
        "task_id": outcome.task_id,
        "backend": outcome.backend,
        "session_id": outcome.session_id,
        "workspace": outcome.workspace,
    }))
}

#[derive(Debug, Deserialize)]
pub struct GetResultArgs {
    pub task_id: String,
    #[serde(default)]
    pub tail_lines: Option<usize>,
}

pub fn get_result(ctx: &Ctx, args: GetResultArgs) -> Result<Value, CoordError> {
    let report = worker_report(&ctx.root, &args.task_id, args.tail_lines.unwrap_or(20))?;
    Ok(json!({
        "task_id": report.task_id,
        "status": report.status,
        "exit_code": report.exit_code,
        "tail": report.tail,
    }))
}

#[derive(Debug, Deserialize)]
pub struct KillArgs {
    pub task_id: String,
}

pub fn kill(ctx: &Ctx, args: KillArgs) -> Result<Value, CoordError> {
    let was_alive = kill_worker(&ctx.root, &args.task_id)?;
    Ok(json!({ "was_alive": was_alive }))
}

#[derive(Debug, Deserialize)]
pub struct DirectiveArgs {
    pub worker_id: String,
    pub content: String,
    #[serde(default)]
    pub priority: Option<String>,
}

/// Deliver a directive to an interactive worker's inbox. The drain hook
/// guarantees the worker observes it before its next tool call; a wake
/// keystroke covers the idle case.
pub async fn send_directive(ctx: &Ctx, args: DirectiveArgs) -> Result<Value, CoordError> {
    let worker_id = validate_artifact_id(&args.worker_id)?;
    if args.content.is_empty() || args.content.len() > ctx.config.limits.message_max_len {
        return Err(CoordError::invalid("directive content out of budget"));
    }
    let priority = match args.priority.as_deref() {
        None | Some("normal") => Priority::Normal,
        Some("urgent") => Priority::Urgent,
        Some(other) => return Err(CoordError::invalid(format!("unknown priority {other:?}"))),
    };

    let meta = results::read_meta(&ctx.root, worker_id)?
        .ok_or_else(|| CoordError::not_found(format!("worker {worker_id:?}")))?;
    if meta.mode != WorkerMode::Interactive {
        return Err(CoordError::invalid(format!(
            "worker {worker_id:?} is a pipe worker and cannot receive directives"
        )));
    }
    let session = meta.session_id.clone().ok_or_else(|| {
        CoordError::invalid(format!("worker {worker_id:?} has no session recorded"))
    })?;

    let mut message = InboxMessage::new("lead", args.content, ctx.now());
    message.priority = priority;
    inbox::append(&ctx.root, &session, &message)?;

    // Idle worker: no tool calls means no drain; nudge it.
    let mut woke = false;
    if let Some(record) = sessions::load(&ctx.root, &session)? {
        if ctx.now().saturating_sub(record.last_active) > DIRECTIVE_IDLE_AFTER_MS {
            let timeout = Duration::from_millis(ctx.config.wake.timeout_ms);
            woke = troupe_adapters::wake_session(&record, timeout).await.is_ok();
        }
    }

    Ok(json!({ "delivered": true, "session_id": session, "woke": woke }))
}

#[cfg(test)]
#[path = "workers_tests.rs"]
mod tests;
