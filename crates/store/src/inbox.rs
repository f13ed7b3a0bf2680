// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-session inboxes.
//!
//! Appends serialize on the inbox file's lock, so delivery is FIFO per
//! inbox. Draining renames the file aside first: appenders that arrive
//! mid-drain create a fresh file, picked up on the next drain.

use crate::fs::{append_json_line, read_jsonl};
use crate::{sessions, StateRoot, StoreError};
use std::path::PathBuf;
use troupe_core::InboxMessage;

/// Append a message to a session's inbox and flag the session record.
pub fn append(root: &StateRoot, short_id: &str, message: &InboxMessage) -> Result<(), StoreError> {
    append_json_line(&root.inbox_path(short_id), message)?;
    // Best-effort: the flag is a hint for dashboards, not a delivery bit.
    if let Err(e) = sessions::set_has_messages(root, short_id, true) {
        tracing::debug!(session = short_id, error = %e, "has_messages flag not set");
    }
    Ok(())
}

/// Read without draining.
pub fn peek(root: &StateRoot, short_id: &str) -> Result<Vec<InboxMessage>, StoreError> {
    read_jsonl(&root.inbox_path(short_id))
}

/// Destructively drain the inbox: rename aside, parse, delete the aside.
///
/// Returns the drained messages in append order. Missing or empty inbox
/// drains as empty.
pub fn take_all(root: &StateRoot, short_id: &str) -> Result<Vec<InboxMessage>, StoreError> {
    let path = root.inbox_path(short_id);
    let aside = drain_path(&path);

    match std::fs::rename(&path, &aside) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(StoreError::io(&path, e)),
    }

    let messages = read_jsonl(&aside)?;
    std::fs::remove_file(&aside).map_err(|e| StoreError::io(&aside, e))?;

    if let Err(e) = sessions::set_has_messages(root, short_id, false) {
        tracing::debug!(session = short_id, error = %e, "has_messages flag not cleared");
    }
    Ok(messages)
}

fn drain_path(path: &std::path::Path) -> PathBuf {
    let mut s = path.as_os_str().to_os_string();
    s.push(format!(".draining.{}", std::process::id()));
    PathBuf::from(s)
}

#[cfg(test)]
#[path = "inbox_tests.rs"]
mod tests;
