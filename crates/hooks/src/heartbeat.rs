// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Heartbeat hook: post tool use.
//!
//! Always appends to the activity log. The session-record update is
//! rate-limited by the flush window: within the window the record is
//! left alone and the fast path stays lock-free apart from the append.
//! With the window at 0 every heartbeat takes the full locked
//! read-modify-write, so no update can be lost.

use crate::{HeartbeatInput, HookError};
use troupe_core::{short_session_id, ActivityEvent};
use troupe_store::{activity, env, sessions, StateRoot};

pub fn run(root: &StateRoot, input: &HeartbeatInput, now: u64) -> Result<(), HookError> {
    let short_id = short_session_id(&input.session_id)?.to_string();

    let event = ActivityEvent {
        ts: now,
        session: short_id.clone(),
        tool: input.tool_name.clone(),
        file: edited_file(input).map(str::to_string),
        path: input.path().map(str::to_string),
        project: (!input.cwd.is_empty()).then(|| troupe_core::session::project_name(&input.cwd)),
    };
    activity::append(root, &event)?;

    let flush_ms = env::heartbeat_flush_ms();

    sessions::with_session(root, &short_id, |current| {
        let Some(mut record) = current else {
            // Unregistered session: the activity line stands alone.
            return Ok((None, ()));
        };

        if flush_ms > 0 && now.saturating_sub(record.last_active) < flush_ms {
            return Ok((None, ()));
        }

        record.record_tool(&input.tool_name, input.file_path(), now);
        Ok((Some(record), ()))
    })?;
    Ok(())
}

fn edited_file(input: &HeartbeatInput) -> Option<&str> {
    matches!(input.tool_name.as_str(), "Edit" | "Write")
        .then(|| input.file_path())
        .flatten()
}

#[cfg(test)]
#[path = "heartbeat_tests.rs"]
mod tests;
