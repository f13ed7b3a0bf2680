// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Register hook: session start.
//!
//! Creates the session record, or refreshes it on replay without
//! clobbering counters; the host re-fires SessionStart on resume and
//! compaction.

use crate::{HookError, RegisterInput};
use troupe_core::{short_session_id, SessionRecord, SessionStatus};
use troupe_store::{sessions, StateRoot};

pub fn run(root: &StateRoot, input: &RegisterInput, now: u64) -> Result<(), HookError> {
    let short_id = short_session_id(&input.session_id)?.to_string();
    let tty = detect_tty();
    let branch = detect_branch(&input.cwd);

    sessions::with_session(root, &short_id, |current| {
        let record = match current {
            Some(mut record) => {
                // Replay: revive, refresh context, keep counters.
                record.status = SessionStatus::Active;
                record.last_active = now;
                record.cwd = input.cwd.clone();
                record.project = troupe_core::session::project_name(&input.cwd);
                if tty.is_some() {
                    record.tty = tty.clone();
                }
                if branch.is_some() {
                    record.branch = branch.clone();
                }
                if input.plan_file.is_some() {
                    record.plan_file = input.plan_file.clone();
                }
                record
            }
            None => {
                let mut record = SessionRecord::new(&short_id, &input.cwd, now);
                record.tty = tty.clone();
                record.branch = branch.clone();
                record.plan_file = input.plan_file.clone();
                record
            }
        };
        Ok((Some(record), ()))
    })?;
    Ok(())
}

/// Controlling terminal of this hook process, best-effort. The hook's
/// stdin is the host's JSON pipe, so stderr is the likeliest tty fd.
#[cfg(unix)]
fn detect_tty() -> Option<String> {
    use std::os::fd::AsFd;
    for fd in [
        std::io::stderr().as_fd().try_clone_to_owned().ok()?,
        std::io::stdout().as_fd().try_clone_to_owned().ok()?,
    ] {
        if let Ok(path) = nix::unistd::ttyname(fd) {
            return Some(path.display().to_string());
        }
    }
    None
}

#[cfg(not(unix))]
fn detect_tty() -> Option<String> {
    None
}

/// Current git branch of the session's working directory, if it is a
/// repository.
fn detect_branch(cwd: &str) -> Option<String> {
    if cwd.is_empty() {
        return None;
    }
    let output = std::process::Command::new("git")
        .args(["rev-parse", "--abbrev-ref", "HEAD"])
        .current_dir(cwd)
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let branch = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!branch.is_empty()).then_some(branch)
}

#[cfg(test)]
#[path = "register_tests.rs"]
mod tests;
