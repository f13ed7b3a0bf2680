// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! trouped: the troupe coordinator.
//!
//! Speaks MCP over stdio. Stdout belongs to the protocol, so logging
//! goes to `<state>/mcp.log` with size-based rotation at startup. A
//! state root that cannot be opened is fatal: the host restarts us.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use troupe_server::{Ctx, Server};
use troupe_store::{Config, StateRoot};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    match parse_args() {
        ArgAction::Run => {}
        ArgAction::Exit(code) => std::process::exit(code),
    }

    let root = StateRoot::discover()?;
    let config = Config::load(&root)?;

    let log_path = root.state_dir().join("mcp.log");
    rotate_log_if_needed(&log_path);
    let _log_guard = setup_logging(&log_path)?;

    tracing::info!(
        root = %root.dir().display(),
        version = env!("CARGO_PKG_VERSION"),
        "coordinator starting"
    );

    let server = Server::new(Ctx::new(root, config));
    server
        .run(tokio::io::stdin(), tokio::io::stdout())
        .await?;

    tracing::info!("stdin closed, coordinator stopping");
    Ok(())
}

enum ArgAction {
    Run,
    Exit(i32),
}

/// Transport selector plus the usual info flags. Stdio is the only
/// transport; naming any other is an error, not a silent default.
fn parse_args() -> ArgAction {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => {
                println!("trouped {}", env!("CARGO_PKG_VERSION"));
                return ArgAction::Exit(0);
            }
            "--help" | "-h" => {
                println!("trouped {}", env!("CARGO_PKG_VERSION"));
                println!("Troupe coordinator - MCP server over stdio");
                println!();
                println!("USAGE:");
                println!("    trouped [--transport stdio]");
                println!();
                println!("The coordinator is typically launched by an MCP client");
                println!("configuration, not by hand. State lives under");
                println!("$TROUPE_STATE_DIR (default ~/.local/state/troupe).");
                return ArgAction::Exit(0);
            }
            "--transport" => match args.next().as_deref() {
                Some("stdio") => {}
                Some(other) => {
                    eprintln!("error: unsupported transport '{other}' (only stdio)");
                    return ArgAction::Exit(1);
                }
                None => {
                    eprintln!("error: --transport requires a value");
                    return ArgAction::Exit(1);
                }
            },
            other => {
                eprintln!("error: unexpected argument '{other}'");
                eprintln!("Usage: trouped [--transport stdio]");
                return ArgAction::Exit(1);
            }
        }
    }
    ArgAction::Run
}

/// Maximum log file size before rotation (10 MB).
const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024;

/// Number of rotated log files to keep (mcp.log.1, .2, .3).
const MAX_ROTATED_LOGS: u32 = 3;

/// Rotate the log file if it exceeds [`MAX_LOG_SIZE`]. Best-effort:
/// rotation failures must not keep the coordinator from starting.
fn rotate_log_if_needed(log_path: &std::path::Path) {
    let size = match std::fs::metadata(log_path) {
        Ok(m) => m.len(),
        Err(_) => return,
    };
    if size < MAX_LOG_SIZE {
        return;
    }

    let log_str = log_path.display().to_string();
    for i in (1..MAX_ROTATED_LOGS).rev() {
        let from = format!("{log_str}.{i}");
        let to = format!("{log_str}.{}", i + 1);
        let _ = std::fs::rename(&from, &to);
    }
    let _ = std::fs::rename(log_path, format!("{log_str}.1"));
}

fn setup_logging(
    log_path: &std::path::Path,
) -> Result<tracing_appender::non_blocking::WorkerGuard, Box<dyn std::error::Error>> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let dir = log_path.parent().ok_or("log path has no parent")?;
    let name = log_path.file_name().ok_or("log path has no file name")?;
    std::fs::create_dir_all(dir)?;

    let file_appender = tracing_appender::rolling::never(dir, name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(guard)
}
