// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Messaging tools: send, broadcast, check.

use crate::error::{CoordError, ErrorKind};
use crate::server::Ctx;
use serde::Deserialize;
use serde_json::{json, Value};
use troupe_core::{short_session_id, validate_artifact_id, InboxMessage, Priority};
use troupe_store::{inbox, rate_limit, sessions};

fn parse_priority(value: Option<&str>) -> Result<Priority, CoordError> {
    match value {
        None | Some("normal") => Ok(Priority::Normal),
        Some("urgent") => Ok(Priority::Urgent),
        Some(other) => Err(CoordError::invalid(format!("unknown priority {other:?}"))),
    }
}

/// Validate content against the configured budget.
fn check_content(ctx: &Ctx, content: &str) -> Result<(), CoordError> {
    if content.is_empty() {
        return Err(CoordError::invalid("empty message content"));
    }
    if content.len() > ctx.config.limits.message_max_len {
        return Err(CoordError::invalid(format!(
            "message exceeds {} byte budget",
            ctx.config.limits.message_max_len
        )));
    }
    Ok(())
}

/// One rate-limited delivery. The counter mutates under its file lock,
/// so concurrent RPCs cannot oversubscribe the budget.
fn deliver(
    ctx: &Ctx,
    from: &str,
    to_short: &str,
    content: &str,
    priority: Priority,
) -> Result<(), CoordError> {
    let decision = rate_limit::check_and_count(
        &ctx.root,
        from,
        to_short,
        ctx.now(),
        ctx.config.limits.rate_limit_max,
        ctx.config.limits.rate_limit_window_ms,
    )?;
    if let rate_limit::Decision::Limited { retry_after_ms } = decision {
        return Err(CoordError::new(
            ErrorKind::RateLimited,
            format!("rate limit for {from} -> {to_short}; retry in {retry_after_ms}ms"),
        ));
    }

    let mut message = InboxMessage::new(from, content, ctx.now());
    message.priority = priority;
    inbox::append(&ctx.root, to_short, &message)?;
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct SendArgs {
    pub from: String,
    pub to: String,
    pub content: String,
    #[serde(default)]
    pub priority: Option<String>,
}

pub fn send(ctx: &Ctx, args: SendArgs) -> Result<Value, CoordError> {
    // Senders are names ("lead") or session ids; either way they name a
    // rate-limit file, so the artifact grammar applies.
    let from = validate_artifact_id(&args.from)?.to_string();
    let to = short_session_id(&args.to)?.to_string();
    let priority = parse_priority(args.priority.as_deref())?;
    check_content(ctx, &args.content)?;

    if sessions::load(&ctx.root, &to)?.is_none() {
        return Err(CoordError::not_found(format!("session {to:?}")));
    }

    deliver(ctx, &from, &to, &args.content, priority)?;
    Ok(json!({ "delivered": true, "to": to }))
}

#[derive(Debug, Deserialize)]
pub struct BroadcastArgs {
    pub from: String,
    pub content: String,
    #[serde(default)]
    pub priority: Option<String>,
}

pub fn broadcast(ctx: &Ctx, args: BroadcastArgs) -> Result<Value, CoordError> {
    let from = validate_artifact_id(&args.from)?.to_string();
    let priority = parse_priority(args.priority.as_deref())?;
    check_content(ctx, &args.content)?;

    let mut delivered = Vec::new();
    let mut skipped = Vec::new();
    for session in sessions::list_live(&ctx.root, ctx.now())? {
        // A session does not broadcast to itself.
        if session.session == from {
            continue;
        }
        match deliver(ctx, &from, &session.session, &args.content, priority) {
            Ok(()) => delivered.push(session.session),
            Err(e) if e.kind == ErrorKind::RateLimited => skipped.push(session.session),
            Err(e) => return Err(e),
        }
    }
    Ok(json!({ "delivered": delivered, "rate_limited": skipped }))
}

#[derive(Debug, Deserialize)]
pub struct CheckArgs {
    pub session_id: String,
}

/// Non-destructive read; the drain hook owns destructive delivery.
pub fn check_inbox(ctx: &Ctx, args: CheckArgs) -> Result<Value, CoordError> {
    let short = short_session_id(&args.session_id)?;
    let messages = inbox::peek(&ctx.root, short)?;
    Ok(json!({ "messages": messages }))
}

#[cfg(test)]
#[path = "messages_tests.rs"]
mod tests;
