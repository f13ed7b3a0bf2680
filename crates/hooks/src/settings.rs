// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hook settings generation for interactive workers.
//!
//! An interactive worker is an ordinary session: it registers,
//! heartbeats, and drains an inbox. This module writes the Claude Code
//! settings file that wires those hooks to the `troupe` binary, merging
//! over the project's own settings when the workspace has any.

use crate::HookError;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use troupe_store::fs::{ensure_dir, safe_write};
use troupe_store::StateRoot;

/// Write `agents/<task_id>/settings.json` and return its path, for the
/// spawn command's `--settings` flag.
pub fn prepare_worker_settings(
    root: &StateRoot,
    task_id: &str,
    workspace: &Path,
) -> Result<PathBuf, HookError> {
    let agent_dir = root.state_dir().join("agents").join(task_id);
    ensure_dir(&agent_dir)?;
    let settings_path = agent_dir.join("settings.json");

    // Start from the workspace's project settings if present.
    let project_settings = workspace.join(".claude/settings.json");
    let mut settings: Value = match std::fs::read_to_string(&project_settings) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|_| json!({})),
        Err(_) => json!({}),
    };

    inject_hooks(&mut settings);

    let pretty = serde_json::to_vec_pretty(&settings)?;
    safe_write(&settings_path, &pretty)?;
    Ok(settings_path)
}

/// Wire the full hook set to `troupe hook ...` commands. Claude Code
/// hooks use the nested matcher/hooks structure.
fn inject_hooks(settings: &mut Value) {
    if !settings.is_object() {
        *settings = json!({});
    }
    let Some(settings_obj) = settings.as_object_mut() else {
        return;
    };

    let hooks = settings_obj.entry("hooks").or_insert_with(|| json!({}));
    if !hooks.is_object() {
        *hooks = json!({});
    }
    let Some(hooks_obj) = hooks.as_object_mut() else {
        return;
    };

    hooks_obj.insert("SessionStart".to_string(), hook_entry("troupe hook register"));
    hooks_obj.insert(
        "PreToolUse".to_string(),
        json!([{
            "matcher": "",
            "hooks": [
                { "type": "command", "command": "troupe hook drain" },
                { "type": "command", "command": "troupe hook guard" },
            ]
        }]),
    );
    hooks_obj.insert("PostToolUse".to_string(), hook_entry("troupe hook heartbeat"));
    hooks_obj.insert("SessionEnd".to_string(), hook_entry("troupe hook end"));
}

fn hook_entry(command: &str) -> Value {
    json!([{
        "matcher": "",
        "hooks": [{ "type": "command", "command": command }]
    }])
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
