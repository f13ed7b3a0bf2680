// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hook dispatch.
//!
//! Each hook reads one JSON object from stdin and exits 0 on success.
//! Validation failures (bad JSON, unsafe session id) exit nonzero with
//! the reason on stderr; the host surfaces stderr to the model, so the
//! drain hook's inbox block is written there too.

use super::now_ms;
use anyhow::bail;
use clap::Subcommand;
use troupe_hooks::{drain, end, guard, heartbeat, input, register, SkipRules};
use troupe_store::StateRoot;

#[derive(Subcommand)]
pub enum HookCommand {
    /// Session start: create or revive the session record
    Register,
    /// Post tool use: activity log append plus session-record update
    Heartbeat,
    /// Pre tool use: drain the inbox and route worker completions
    Drain,
    /// Pre-edit advisory: warn on cross-session file conflicts
    Guard,
    /// Session end: close the session record
    End,
}

pub fn run(hook: HookCommand) -> anyhow::Result<()> {
    let root = StateRoot::discover()?;
    let mut stdin = std::io::stdin().lock();
    let now = now_ms();

    let outcome = match hook {
        HookCommand::Register => input::decode(&mut stdin)
            .and_then(|input| register::run(&root, &input, now)),
        HookCommand::Heartbeat => input::decode(&mut stdin)
            .and_then(|input| heartbeat::run(&root, &input, now)),
        HookCommand::Drain => input::decode(&mut stdin)
            .and_then(|input| drain::run(&root, &input, now, &mut std::io::stderr())),
        HookCommand::Guard => input::decode(&mut stdin).and_then(|input| {
            guard::run(
                &root,
                &input,
                &SkipRules::from_env(),
                now,
                &mut std::io::stderr(),
            )
        }),
        HookCommand::End => {
            input::decode(&mut stdin).and_then(|input| end::run(&root, &input))
        }
    };

    if let Err(e) = outcome {
        bail!("{e}");
    }
    Ok(())
}
