// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inbox-drain hook: pre tool use.
//!
//! Two jobs, in order: empty this session's inbox onto stderr (the host
//! surfaces it to the model before the tool call runs), then route any
//! finished worker addressed to this session: tail its output into an
//! inbox message and claim the `.reported` marker. The marker's
//! exclusive create is what makes delivery at-most-once under
//! concurrent drainers; completions without a `notify_session_id` are
//! left unclaimed for explicit collection.

use crate::{DrainInput, HookError};
use std::io::Write;
use troupe_core::{short_session_id, InboxMessage, WorkerStatus};
use troupe_store::{inbox, results, StateRoot};

/// Lines of worker output quoted in a completion notification.
const COMPLETION_TAIL_LINES: usize = 20;

pub fn run(
    root: &StateRoot,
    input: &DrainInput,
    now: u64,
    out: &mut impl Write,
) -> Result<(), HookError> {
    let short_id = short_session_id(&input.session_id)?.to_string();

    drain_inbox(root, &short_id, out)?;
    route_completions(root, &short_id, now)?;
    Ok(())
}

fn drain_inbox(root: &StateRoot, short_id: &str, out: &mut impl Write) -> Result<(), HookError> {
    let messages = inbox::take_all(root, short_id)?;
    if messages.is_empty() {
        return Ok(());
    }

    writeln!(out, "[INBOX] {} message(s) for {}:", messages.len(), short_id)?;
    for msg in &messages {
        writeln!(out, "  [{}] from {}: {}", msg.priority, msg.from, msg.content)?;
    }
    Ok(())
}

fn route_completions(root: &StateRoot, short_id: &str, now: u64) -> Result<(), HookError> {
    for task_id in results::finished_ids(root)? {
        if results::is_reported(root, &task_id) {
            continue;
        }
        // The results dir also holds pipeline metas; anything that does
        // not parse as a worker meta is not routable here.
        let Ok(Some(meta)) = results::read_meta(root, &task_id) else {
            continue;
        };
        // Untargeted or foreign completions are not ours to claim.
        if meta.notify_session_id.as_deref() != Some(short_id) {
            continue;
        }
        if !results::claim_reported(root, &task_id)? {
            continue; // another drainer won the race
        }

        let status = results::read_done(root, &task_id)?
            .map(|d| d.status)
            .unwrap_or(WorkerStatus::Completed);
        let tail = results::tail_output(root, &task_id, COMPLETION_TAIL_LINES)?;
        let mut content = format!("[WORKER COMPLETED] {task_id}: {status}");
        if !tail.is_empty() {
            content.push('\n');
            content.push_str(&tail);
        }
        inbox::append(
            root,
            short_id,
            &InboxMessage::new(format!("worker/{task_id}"), content, now),
        )?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "drain_tests.rs"]
mod tests;
