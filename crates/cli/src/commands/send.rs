// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shell-equivalent of `coord_send_message`, including the rate limit:
//! writing the same files means honoring the same discipline.

use super::now_ms;
use anyhow::bail;
use troupe_core::{short_session_id, validate_artifact_id, InboxMessage};
use troupe_store::{inbox, rate_limit, sessions, Config, StateRoot};

pub fn run(from: &str, to: &str, urgent: bool, content: &str) -> anyhow::Result<()> {
    let root = StateRoot::discover()?;
    let config = Config::load(&root)?;
    let now = now_ms();

    let from = validate_artifact_id(from)?;
    let to = short_session_id(to)?;
    if content.is_empty() || content.len() > config.limits.message_max_len {
        bail!("message content out of budget (max {} bytes)", config.limits.message_max_len);
    }
    if sessions::load(&root, to)?.is_none() {
        bail!("no such session: {to}");
    }

    let decision = rate_limit::check_and_count(
        &root,
        from,
        to,
        now,
        config.limits.rate_limit_max,
        config.limits.rate_limit_window_ms,
    )?;
    if let rate_limit::Decision::Limited { retry_after_ms } = decision {
        bail!("rate limited; retry in {}s", retry_after_ms.div_ceil(1000));
    }

    let message = if urgent {
        InboxMessage::urgent(from, content, now)
    } else {
        InboxMessage::new(from, content, now)
    };
    inbox::append(&root, to, &message)?;
    println!("queued for {to}");
    Ok(())
}
