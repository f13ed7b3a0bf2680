// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shell-equivalent of `coord_wake_session`.

use super::now_ms;
use anyhow::bail;
use std::time::Duration;
use troupe_core::{short_session_id, InboxMessage};
use troupe_store::{inbox, sessions, Config, StateRoot};

pub fn run(session_id: &str, message: &str) -> anyhow::Result<()> {
    let root = StateRoot::discover()?;
    let config = Config::load(&root)?;
    let short = short_session_id(session_id)?.to_string();

    let Some(record) = sessions::load(&root, &short)? else {
        bail!("no such session: {short}");
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let timeout = Duration::from_millis(config.wake.timeout_ms);
    match runtime.block_on(troupe_adapters::wake_session(&record, timeout)) {
        Ok(path) => {
            inbox::append(&root, &short, &InboxMessage::new("coordinator", message, now_ms()))?;
            println!("woke {short} via {path}");
        }
        Err(e) => {
            inbox::append(
                &root,
                &short,
                &InboxMessage::urgent("coordinator", format!("[WAKE] {message}"), now_ms()),
            )?;
            println!("wake failed ({e}); urgent message queued for {short}");
        }
    }
    Ok(())
}
