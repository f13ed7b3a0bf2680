// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Conflict-guard hook: pre-edit advisory.
//!
//! Warns when another live session already lists the target file in its
//! `files_touched`. Purely advisory: the warning goes to stderr and the
//! tool call always proceeds. The only failure mode is an invalid
//! session id, which fails closed like every hook.

use crate::{GuardInput, HookError, SkipRules};
use std::io::Write;
use troupe_core::{short_session_id, SessionStatus};
use troupe_store::{sessions, StateRoot};

pub fn run(
    root: &StateRoot,
    input: &GuardInput,
    skip: &SkipRules,
    now: u64,
    out: &mut impl Write,
) -> Result<(), HookError> {
    let short_id = short_session_id(&input.session_id)?.to_string();

    if skip.conflict {
        return Ok(());
    }
    if !matches!(input.tool_name.as_str(), "Edit" | "Write") {
        return Ok(());
    }
    let Some(file) = input.file_path() else {
        return Ok(());
    };

    // The stale skip rule keeps this read-only: no stale transitions
    // are persisted from the guard's scan.
    let records = if skip.stale {
        sessions::list(root)?
            .into_iter()
            .filter(|s| s.status != SessionStatus::Closed)
            .collect()
    } else {
        sessions::list_live(root, now)?
    };

    let holders: Vec<String> = records
        .into_iter()
        .filter(|s| s.session != short_id)
        .filter(|s| s.files_touched.iter().any(|f| f == file))
        .map(|s| s.session)
        .collect();

    if !holders.is_empty() {
        writeln!(
            out,
            "[CONFLICT] {} is also being edited by session(s): {}",
            file,
            holders.join(", ")
        )?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "guard_tests.rs"]
mod tests;
