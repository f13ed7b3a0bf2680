// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session tools: listing, lookup, conflict detection, wake.

use crate::error::{CoordError, ErrorKind};
use crate::server::Ctx;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::time::Duration;
use troupe_core::{short_session_id, InboxMessage};
use troupe_store::{inbox, sessions};

pub fn list(ctx: &Ctx) -> Result<Value, CoordError> {
    let live = sessions::list_live(&ctx.root, ctx.now())?;
    Ok(json!({ "sessions": live }))
}

#[derive(Debug, Deserialize)]
pub struct GetArgs {
    pub session_id: String,
}

pub fn get(ctx: &Ctx, args: GetArgs) -> Result<Value, CoordError> {
    let short = short_session_id(&args.session_id)?;
    match sessions::load(&ctx.root, short)? {
        Some(record) => Ok(json!({ "session": record })),
        None => Err(CoordError::not_found(format!("session {short:?}"))),
    }
}

/// Build the file → sessions multimap and keep entries with two or more
/// holders.
pub fn detect_conflicts(ctx: &Ctx) -> Result<Value, CoordError> {
    let live = sessions::list_live(&ctx.root, ctx.now())?;
    let mut by_file: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for session in &live {
        for file in &session.files_touched {
            by_file.entry(file).or_default().push(&session.session);
        }
    }

    let conflicts: Vec<Value> = by_file
        .into_iter()
        .filter(|(_, holders)| holders.len() >= 2)
        .map(|(file, holders)| json!({ "file": file, "sessions": holders }))
        .collect();
    Ok(json!({ "conflicts": conflicts }))
}

#[derive(Debug, Deserialize)]
pub struct WakeArgs {
    pub session_id: String,
    pub message: String,
}

/// Wake a session with an Enter keystroke; the message rides the inbox
/// either way. When every wake path fails, the message is queued urgent
/// and the result reports the fallback instead of erroring.
pub async fn wake(ctx: &Ctx, args: WakeArgs) -> Result<Value, CoordError> {
    let short = short_session_id(&args.session_id)?.to_string();
    let record = sessions::load(&ctx.root, &short)?
        .ok_or_else(|| CoordError::not_found(format!("session {short:?}")))?;

    if args.message.len() > ctx.config.limits.message_max_len {
        return Err(CoordError::invalid("message exceeds length budget"));
    }

    let timeout = Duration::from_millis(ctx.config.wake.timeout_ms);
    match troupe_adapters::wake_session(&record, timeout).await {
        Ok(path) => {
            inbox::append(
                &ctx.root,
                &short,
                &InboxMessage::new("coordinator", args.message, ctx.now()),
            )?;
            Ok(json!({ "woken": true, "path": path }))
        }
        Err(e) => {
            tracing::warn!(session = %short, error = %e, "wake fell back to inbox");
            inbox::append(
                &ctx.root,
                &short,
                &InboxMessage::urgent("coordinator", format!("[WAKE] {}", args.message), ctx.now()),
            )?;
            Ok(json!({
                "woken": false,
                "kind": ErrorKind::WakeFailedFellBack,
                "detail": e.to_string(),
            }))
        }
    }
}

#[cfg(test)]
#[path = "sessions_tests.rs"]
mod tests;
