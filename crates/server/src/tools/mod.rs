// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `coord_*` tool surface.
//!
//! One module per family; this module owns the registry (names,
//! descriptions, input schemas) and the dispatcher. Argument decoding
//! failures are `invalid_argument` before any handler runs.

mod messages;
mod pipelines;
mod sessions;
mod tasks;
mod teams;
mod workers;

use crate::error::CoordError;
use crate::protocol::ToolDef;
use crate::server::Ctx;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

/// Decode a tool's arguments object.
fn args<T: DeserializeOwned>(value: &Value) -> Result<T, CoordError> {
    serde_json::from_value(value.clone()).map_err(|e| CoordError::invalid(e.to_string()))
}

/// Every tool the coordinator exposes.
pub fn definitions() -> Vec<ToolDef> {
    vec![
        ToolDef {
            name: "coord_list_sessions",
            description: "List every live session record (active and stale; closed omitted)",
            input_schema: json!({ "type": "object", "properties": {} }),
        },
        ToolDef {
            name: "coord_get_session",
            description: "Fetch one session record by session id",
            input_schema: json!({
                "type": "object",
                "properties": { "session_id": { "type": "string" } },
                "required": ["session_id"]
            }),
        },
        ToolDef {
            name: "coord_send_message",
            description: "Append a message to a session's inbox (rate limited per sender/recipient)",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "from": { "type": "string" },
                    "to": { "type": "string" },
                    "content": { "type": "string" },
                    "priority": { "type": "string", "enum": ["normal", "urgent"] }
                },
                "required": ["from", "to", "content"]
            }),
        },
        ToolDef {
            name: "coord_broadcast",
            description: "Send a message to every non-closed session",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "from": { "type": "string" },
                    "content": { "type": "string" },
                    "priority": { "type": "string", "enum": ["normal", "urgent"] }
                },
                "required": ["from", "content"]
            }),
        },
        ToolDef {
            name: "coord_check_inbox",
            description: "Read a session's inbox without draining it (draining is the hook's job)",
            input_schema: json!({
                "type": "object",
                "properties": { "session_id": { "type": "string" } },
                "required": ["session_id"]
            }),
        },
        ToolDef {
            name: "coord_detect_conflicts",
            description: "Files currently touched by two or more live sessions",
            input_schema: json!({ "type": "object", "properties": {} }),
        },
        ToolDef {
            name: "coord_spawn_terminal",
            description: "Open an interactive pane in a directory",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "directory": { "type": "string" },
                    "layout": { "type": "string", "enum": ["tab", "split"] }
                },
                "required": ["directory"]
            }),
        },
        ToolDef {
            name: "coord_spawn_worker",
            description: "Spawn a subordinate session on a task (pipe or interactive)",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "directory": { "type": "string" },
                    "prompt": { "type": "string" },
                    "model": { "type": "string" },
                    "agent": { "type": "string" },
                    "task_id": { "type": "string" },
                    "mode": { "type": "string", "enum": ["pipe", "interactive"] },
                    "isolate": { "type": "boolean" },
                    "notify_session_id": { "type": "string" }
                },
                "required": ["directory", "prompt"]
            }),
        },
        ToolDef {
            name: "coord_get_result",
            description: "Worker status (running/completed/failed/unknown) plus output tail",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "task_id": { "type": "string" },
                    "tail_lines": { "type": "integer" }
                },
                "required": ["task_id"]
            }),
        },
        ToolDef {
            name: "coord_kill_worker",
            description: "Terminate a worker's process tree; reports whether it was alive",
            input_schema: json!({
                "type": "object",
                "properties": { "task_id": { "type": "string" } },
                "required": ["task_id"]
            }),
        },
        ToolDef {
            name: "coord_wake_session",
            description: "Deliver an Enter keystroke to an idle session; message goes via inbox",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "session_id": { "type": "string" },
                    "message": { "type": "string" }
                },
                "required": ["session_id", "message"]
            }),
        },
        ToolDef {
            name: "coord_run_pipeline",
            description: "Run worker steps sequentially; returns immediately with the pipeline id",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "steps": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "name": { "type": "string" },
                                "prompt": { "type": "string" },
                                "directory": { "type": "string" }
                            },
                            "required": ["name", "prompt"]
                        }
                    },
                    "directory": { "type": "string" },
                    "pipeline_id": { "type": "string" }
                },
                "required": ["steps"]
            }),
        },
        ToolDef {
            name: "coord_get_pipeline",
            description: "Aggregate pipeline status plus per-step status",
            input_schema: json!({
                "type": "object",
                "properties": { "pipeline_id": { "type": "string" } },
                "required": ["pipeline_id"]
            }),
        },
        ToolDef {
            name: "coord_send_directive",
            description: "Send a mid-run directive to an interactive worker, waking it if idle",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "worker_id": { "type": "string" },
                    "content": { "type": "string" },
                    "priority": { "type": "string", "enum": ["normal", "urgent"] }
                },
                "required": ["worker_id", "content"]
            }),
        },
        ToolDef {
            name: "coord_create_task",
            description: "Create a task on the shared board",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "task_id": { "type": "string" },
                    "subject": { "type": "string" },
                    "assignee": { "type": "string" },
                    "blocked_by": { "type": "array", "items": { "type": "string" } }
                },
                "required": ["subject"]
            }),
        },
        ToolDef {
            name: "coord_update_task",
            description: "Update task status, assignee, or dependencies (cycles rejected)",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "task_id": { "type": "string" },
                    "status": { "type": "string", "enum": ["pending", "in_progress", "completed", "blocked"] },
                    "assignee": { "type": "string" },
                    "subject": { "type": "string" },
                    "blocked_by": { "type": "array", "items": { "type": "string" } }
                },
                "required": ["task_id"]
            }),
        },
        ToolDef {
            name: "coord_list_tasks",
            description: "List every task on the board",
            input_schema: json!({ "type": "object", "properties": {} }),
        },
        ToolDef {
            name: "coord_get_task",
            description: "Fetch one task by id",
            input_schema: json!({
                "type": "object",
                "properties": { "task_id": { "type": "string" } },
                "required": ["task_id"]
            }),
        },
        ToolDef {
            name: "coord_create_team",
            description: "Create a named team of sessions",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "project": { "type": "string" },
                    "members": { "type": "array", "items": { "type": "string" } }
                },
                "required": ["name"]
            }),
        },
        ToolDef {
            name: "coord_get_team",
            description: "Fetch one team by name",
            input_schema: json!({
                "type": "object",
                "properties": { "name": { "type": "string" } },
                "required": ["name"]
            }),
        },
        ToolDef {
            name: "coord_list_teams",
            description: "List every team",
            input_schema: json!({ "type": "object", "properties": {} }),
        },
    ]
}

/// Route a `tools/call` to its handler.
pub async fn dispatch(ctx: &Ctx, name: &str, arguments: &Value) -> Result<Value, CoordError> {
    match name {
        "coord_list_sessions" => sessions::list(ctx),
        "coord_get_session" => sessions::get(ctx, args(arguments)?),
        "coord_detect_conflicts" => sessions::detect_conflicts(ctx),
        "coord_wake_session" => sessions::wake(ctx, args(arguments)?).await,
        "coord_send_message" => messages::send(ctx, args(arguments)?),
        "coord_broadcast" => messages::broadcast(ctx, args(arguments)?),
        "coord_check_inbox" => messages::check_inbox(ctx, args(arguments)?),
        "coord_spawn_terminal" => workers::spawn_terminal(ctx, args(arguments)?).await,
        "coord_spawn_worker" => workers::spawn(ctx, args(arguments)?).await,
        "coord_get_result" => workers::get_result(ctx, args(arguments)?),
        "coord_kill_worker" => workers::kill(ctx, args(arguments)?),
        "coord_send_directive" => workers::send_directive(ctx, args(arguments)?).await,
        "coord_run_pipeline" => pipelines::run(ctx, args(arguments)?),
        "coord_get_pipeline" => pipelines::get(ctx, args(arguments)?),
        "coord_create_task" => tasks::create(ctx, args(arguments)?),
        "coord_update_task" => tasks::update(ctx, args(arguments)?),
        "coord_list_tasks" => tasks::list(ctx),
        "coord_get_task" => tasks::get(ctx, args(arguments)?),
        "coord_create_team" => teams::create(ctx, args(arguments)?),
        "coord_get_team" => teams::get(ctx, args(arguments)?),
        "coord_list_teams" => teams::list(ctx),
        other => Err(CoordError::not_found(format!("unknown tool {other:?}"))),
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
