// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task board tools.

use crate::error::{CoordError, ErrorKind};
use crate::server::Ctx;
use serde::Deserialize;
use serde_json::{json, Value};
use troupe_core::{
    validate_artifact_id, would_create_cycle, IdGen, ShortId, TaskRecord, TaskStatus, UuidIdGen,
};
use troupe_store::tasks;

fn parse_status(value: &str) -> Result<TaskStatus, CoordError> {
    match value {
        "pending" => Ok(TaskStatus::Pending),
        "in_progress" => Ok(TaskStatus::InProgress),
        "completed" => Ok(TaskStatus::Completed),
        "blocked" => Ok(TaskStatus::Blocked),
        other => Err(CoordError::invalid(format!("unknown status {other:?}"))),
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateArgs {
    #[serde(default)]
    pub task_id: Option<String>,
    pub subject: String,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub blocked_by: Vec<String>,
}

pub fn create(ctx: &Ctx, args: CreateArgs) -> Result<Value, CoordError> {
    if args.subject.trim().is_empty() {
        return Err(CoordError::invalid("empty subject"));
    }
    let task_id = match &args.task_id {
        Some(id) => validate_artifact_id(id)?.to_string(),
        None => {
            let raw = UuidIdGen.next();
            format!("task-{}", raw.short(8))
        }
    };
    for dep in &args.blocked_by {
        validate_artifact_id(dep)?;
    }

    let mut task = TaskRecord::new(&task_id, args.subject.trim(), ctx.now());
    task.assignee = args.assignee.clone();
    task.blocked_by = args.blocked_by.clone();
    if !task.blocked_by.is_empty() {
        // Self-dependencies are a degenerate cycle.
        let board = tasks::board(&ctx.root)?;
        if would_create_cycle(&board, &task_id, &task.blocked_by) {
            return Err(CoordError::invalid("blocked_by would create a cycle"));
        }
        task.status = TaskStatus::Blocked;
    }

    if !tasks::create(&ctx.root, &task)? {
        return Err(CoordError::new(
            ErrorKind::Conflict,
            format!("task id {task_id:?} already exists"),
        ));
    }
    Ok(json!({ "task": task }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateArgs {
    pub task_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub blocked_by: Option<Vec<String>>,
}

pub fn update(ctx: &Ctx, args: UpdateArgs) -> Result<Value, CoordError> {
    let task_id = validate_artifact_id(&args.task_id)?.to_string();
    let status = args.status.as_deref().map(parse_status).transpose()?;

    // Cycle check against the whole board before taking the task's lock.
    if let Some(new_deps) = &args.blocked_by {
        for dep in new_deps {
            validate_artifact_id(dep)?;
        }
        let board = tasks::board(&ctx.root)?;
        if would_create_cycle(&board, &task_id, new_deps) {
            return Err(CoordError::invalid("blocked_by would create a cycle"));
        }
    }

    let now = ctx.now();
    let updated = tasks::update(&ctx.root, &task_id, |mut task| {
        if let Some(status) = status {
            task.status = status;
        }
        if let Some(assignee) = &args.assignee {
            task.assignee = Some(assignee.clone());
        }
        if let Some(subject) = &args.subject {
            task.subject = subject.clone();
        }
        if let Some(deps) = &args.blocked_by {
            task.blocked_by = deps.clone();
        }
        task.updated = now;
        Ok((task.clone(), task))
    })?;

    match updated {
        Some(task) => Ok(json!({ "task": task })),
        None => Err(CoordError::not_found(format!("task {task_id:?}"))),
    }
}

pub fn list(ctx: &Ctx) -> Result<Value, CoordError> {
    Ok(json!({ "tasks": tasks::list(&ctx.root)? }))
}

#[derive(Debug, Deserialize)]
pub struct GetArgs {
    pub task_id: String,
}

pub fn get(ctx: &Ctx, args: GetArgs) -> Result<Value, CoordError> {
    let task_id = validate_artifact_id(&args.task_id)?;
    match tasks::load(&ctx.root, task_id)? {
        Some(task) => Ok(json!({ "task": task })),
        None => Err(CoordError::not_found(format!("task {task_id:?}"))),
    }
}

#[cfg(test)]
#[path = "tasks_tests.rs"]
mod tests;
