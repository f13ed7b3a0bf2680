// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! troupe - coordination CLI for concurrent Claude Code sessions
//!
//! The hook subcommands are what the Claude Code runtime invokes; the
//! rest are shell-equivalents of the coordinator tools, working on the
//! same files so everything keeps functioning when no coordinator is
//! running. The on-disk contract is the public API.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod commands;

use clap::{Parser, Subcommand};
use commands::{hook, result, send, status, wake};

#[derive(Parser)]
#[command(
    name = "troupe",
    version,
    about = "Troupe - a coordination layer for concurrent Claude Code sessions"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hook entrypoints invoked by the Claude Code runtime (JSON on stdin)
    Hook {
        #[command(subcommand)]
        hook: hook::HookCommand,
    },

    /// Dashboard: sessions, conflicts, workers, tasks
    Status,

    /// Append a message to a session's inbox
    Send {
        /// Sender name or session id
        #[arg(long, default_value = "lead")]
        from: String,
        /// Recipient session id
        #[arg(long)]
        to: String,
        /// Mark the message urgent
        #[arg(long)]
        urgent: bool,
        /// Message content
        content: String,
    },

    /// Send an Enter keystroke to an idle session
    Wake {
        /// Target session id
        session_id: String,
        /// Message delivered through the inbox
        #[arg(short, long, default_value = "wake")]
        message: String,
    },

    /// Show a worker's status and output tail
    Result {
        /// Worker task id
        task_id: String,
        /// Output lines to show
        #[arg(long, default_value_t = 20)]
        tail: usize,
    },
}

fn main() {
    let cli = Cli::parse();
    let code = match run(cli) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{e}");
            1
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Hook { hook } => hook::run(hook),
        Commands::Status => status::run(),
        Commands::Send {
            from,
            to,
            urgent,
            content,
        } => send::run(&from, &to, urgent, &content),
        Commands::Wake {
            session_id,
            message,
        } => wake::run(&session_id, &message),
        Commands::Result { task_id, tail } => result::run(&task_id, tail),
    }
}
