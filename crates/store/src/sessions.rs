// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session record accessors.
//!
//! Session records are mutated only through [`with_session`], which
//! serializes writers on a per-record lock. Everything in a record is
//! therefore internally consistent; across records there is no ordering.

use crate::fs::{read_json, safe_write_json};
use crate::lock::with_lock;
use crate::{StateRoot, StoreError};
use troupe_core::{SessionRecord, SessionStatus};

/// Load a session record by short id. `Ok(None)` when absent.
pub fn load(root: &StateRoot, short_id: &str) -> Result<Option<SessionRecord>, StoreError> {
    read_json(&root.session_path(short_id))
}

/// Read-modify-write a session record under its lock.
///
/// `f` receives the current record (`None` when absent) and returns the
/// record to persist, or `None` to leave the file untouched.
pub fn with_session<T>(
    root: &StateRoot,
    short_id: &str,
    f: impl FnOnce(Option<SessionRecord>) -> Result<(Option<SessionRecord>, T), StoreError>,
) -> Result<T, StoreError> {
    let path = root.session_path(short_id);
    with_lock(&path, || {
        let current = read_json(&path)?;
        let (updated, out) = f(current)?;
        if let Some(record) = updated {
            safe_write_json(&path, &record)?;
        }
        Ok(out)
    })
}

/// All session records, skipping unparseable files with a stderr warning.
pub fn list(root: &StateRoot) -> Result<Vec<SessionRecord>, StoreError> {
    let mut sessions = Vec::new();
    let dir = root.dir();
    let entries = std::fs::read_dir(dir).map_err(|e| StoreError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| StoreError::io(dir, e))?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if !name.starts_with("session-") || !name.ends_with(".json") {
            continue;
        }
        match read_json::<SessionRecord>(&entry.path()) {
            Ok(Some(record)) => sessions.push(record),
            Ok(None) => {}
            Err(e) => eprintln!("troupe: skipping unreadable {}: {}", name, e),
        }
    }
    sessions.sort_by(|a, b| a.session.cmp(&b.session));
    Ok(sessions)
}

/// All non-closed sessions, with the staleness horizon applied and
/// persisted best-effort: an observer noticing a session went quiet
/// transitions it to `stale` for everyone.
pub fn list_live(root: &StateRoot, now: u64) -> Result<Vec<SessionRecord>, StoreError> {
    let mut live = Vec::new();
    for mut record in list(root)? {
        if record.status == SessionStatus::Closed {
            continue;
        }
        if record.effective_status(now) == SessionStatus::Stale
            && record.status == SessionStatus::Active
        {
            record.status = SessionStatus::Stale;
            let short_id = record.session.clone();
            if let Err(e) = mark_status(root, &short_id, SessionStatus::Stale) {
                tracing::debug!(session = %short_id, error = %e, "stale transition not persisted");
            }
        }
        live.push(record);
    }
    Ok(live)
}

/// Transition a session's status under its lock. Missing records are a
/// no-op: the observer lost a race with a purge.
pub fn mark_status(
    root: &StateRoot,
    short_id: &str,
    status: SessionStatus,
) -> Result<(), StoreError> {
    with_session(root, short_id, |current| match current {
        Some(mut record) => {
            // closed is terminal
            if record.status != SessionStatus::Closed {
                record.status = status;
            }
            Ok((Some(record), ()))
        }
        None => Ok((None, ())),
    })
}

/// Set or clear the undrained-messages flag.
pub fn set_has_messages(
    root: &StateRoot,
    short_id: &str,
    has_messages: bool,
) -> Result<(), StoreError> {
    with_session(root, short_id, |current| match current {
        Some(mut record) => {
            record.has_messages = has_messages;
            Ok((Some(record), ()))
        }
        None => Ok((None, ())),
    })
}

#[cfg(test)]
#[path = "sessions_tests.rs"]
mod tests;
