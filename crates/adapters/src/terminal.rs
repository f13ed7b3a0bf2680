// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal launching.
//!
//! Opens a new pane or tab running a command, probing emulators in
//! priority order per platform: tmux first when the coordinator itself
//! runs inside one, then the platform's native emulators, then a
//! detached background subprocess as the last resort (worker scripts
//! capture their own output, so headless still produces a result file).

use crate::subprocess::{command_exists, run_with_timeout, BRIDGE_TIMEOUT, TMUX_TIMEOUT};
use crate::{env, process, AdapterError};
use std::path::Path;
use tokio::process::Command;

/// Requested pane placement. Split only matters to multiplexers; plain
/// emulators open a tab or window either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    #[default]
    Tab,
    Split,
}

impl Layout {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "tab" => Some(Layout::Tab),
            "split" => Some(Layout::Split),
            _ => None,
        }
    }
}

/// Open a terminal running `command` in `dir`.
///
/// Returns the name of the backend that accepted the launch. Detection
/// failure and launch failure both fall back to [`headless`].
pub async fn open_terminal(
    command: &str,
    dir: &Path,
    layout: Layout,
) -> Result<&'static str, AdapterError> {
    if env::test_headless() {
        return headless(command, dir);
    }

    if env::inside_tmux() {
        match tmux_open(command, dir, layout).await {
            Ok(()) => return Ok("tmux"),
            Err(e) => tracing::warn!(error = %e, "tmux launch failed, trying platform backends"),
        }
    }

    match platform_open(command, dir, layout).await {
        Ok(backend) => Ok(backend),
        Err(e) => {
            tracing::warn!(error = %e, "terminal launch failed, falling back to background");
            headless(command, dir)
        }
    }
}

fn headless(command: &str, dir: &Path) -> Result<&'static str, AdapterError> {
    process::spawn_detached(command, dir)?;
    Ok("background")
}

async fn tmux_open(command: &str, dir: &Path, layout: Layout) -> Result<(), AdapterError> {
    let mut cmd = Command::new("tmux");
    match layout {
        Layout::Tab => cmd.arg("new-window"),
        Layout::Split => cmd.arg("split-window").arg("-d"),
    };
    cmd.arg("-c").arg(dir).arg(command);

    let output = run_with_timeout(cmd, TMUX_TIMEOUT, "tmux launch")
        .await
        .map_err(AdapterError::LaunchFailed)?;
    if !output.status.success() {
        return Err(AdapterError::LaunchFailed(
            String::from_utf8_lossy(&output.stderr).to_string(),
        ));
    }
    Ok(())
}

#[cfg(target_os = "macos")]
async fn platform_open(
    command: &str,
    dir: &Path,
    _layout: Layout,
) -> Result<&'static str, AdapterError> {
    // iTerm2 when it is the hosting emulator, Terminal.app otherwise.
    let shell_line = format!("cd {} && {}", shell_single_quote(&dir.display().to_string()), command);
    let (backend, script) = if std::env::var("TERM_PROGRAM").as_deref() == Ok("iTerm.app") {
        (
            "iterm2",
            format!(
                "tell application \"iTerm2\"\n  tell current window to create tab with default profile\n  tell current session of current window to write text \"{}\"\nend tell",
                applescript_escape(&shell_line)
            ),
        )
    } else {
        (
            "terminal-app",
            format!(
                "tell application \"Terminal\" to do script \"{}\"",
                applescript_escape(&shell_line)
            ),
        )
    };

    let mut cmd = Command::new("osascript");
    cmd.arg("-e").arg(script);
    let output = run_with_timeout(cmd, BRIDGE_TIMEOUT, "osascript launch")
        .await
        .map_err(AdapterError::LaunchFailed)?;
    if !output.status.success() {
        return Err(AdapterError::LaunchFailed(
            String::from_utf8_lossy(&output.stderr).to_string(),
        ));
    }
    Ok(backend)
}

#[cfg(all(unix, not(target_os = "macos")))]
async fn platform_open(
    command: &str,
    dir: &Path,
    _layout: Layout,
) -> Result<&'static str, AdapterError> {
    // Probe common emulators in priority order.
    let candidates: &[(&str, fn(&str, &Path) -> Command)] = &[
        ("gnome-terminal", |cmd, dir| {
            let mut c = Command::new("gnome-terminal");
            c.arg(format!("--working-directory={}", dir.display()))
                .arg("--")
                .arg("sh")
                .arg("-c")
                .arg(cmd.to_string());
            c
        }),
        ("konsole", |cmd, dir| {
            let mut c = Command::new("konsole");
            c.arg("--workdir")
                .arg(dir)
                .arg("-e")
                .arg("sh")
                .arg("-c")
                .arg(cmd.to_string());
            c
        }),
        ("kitty", |cmd, dir| {
            let mut c = Command::new("kitty");
            c.arg("--directory")
                .arg(dir)
                .arg("sh")
                .arg("-c")
                .arg(cmd.to_string());
            c
        }),
        ("alacritty", |cmd, dir| {
            let mut c = Command::new("alacritty");
            c.arg("--working-directory")
                .arg(dir)
                .arg("-e")
                .arg("sh")
                .arg("-c")
                .arg(cmd.to_string());
            c
        }),
        ("xterm", |cmd, dir| {
            let mut c = Command::new("xterm");
            c.current_dir(dir).arg("-e").arg(format!("sh -c {}", shell_single_quote(cmd)));
            c
        }),
    ];

    for &(name, build) in candidates {
        if !command_exists(name) {
            continue;
        }
        let output = run_with_timeout(build(command, dir), BRIDGE_TIMEOUT, name)
            .await
            .map_err(AdapterError::LaunchFailed)?;
        if output.status.success() {
            return Ok(name);
        }
        tracing::warn!(backend = name, "launch exited nonzero, trying next");
    }
    Err(AdapterError::LaunchFailed(
        "no terminal emulator found".to_string(),
    ))
}

#[cfg(windows)]
async fn platform_open(
    command: &str,
    dir: &Path,
    layout: Layout,
) -> Result<&'static str, AdapterError> {
    // Launch scripts are PowerShell on this platform; cmd.exe only ever
    // hosts the window, never interprets the command.
    if command_exists("wt") {
        let mut cmd = Command::new("wt");
        if layout == Layout::Split {
            cmd.arg("split-pane");
        } else {
            cmd.arg("new-tab");
        }
        cmd.arg("-d")
            .arg(dir)
            .args(["powershell", "-NoProfile", "-Command"])
            .arg(command);
        let output = run_with_timeout(cmd, BRIDGE_TIMEOUT, "wt launch")
            .await
            .map_err(AdapterError::LaunchFailed)?;
        if output.status.success() {
            return Ok("wt");
        }
    }

    let mut cmd = Command::new("cmd");
    cmd.current_dir(dir)
        .args(["/C", "start", "", "powershell", "-NoProfile", "-NoExit", "-Command"])
        .arg(command);
    let output = run_with_timeout(cmd, BRIDGE_TIMEOUT, "cmd start")
        .await
        .map_err(AdapterError::LaunchFailed)?;
    if output.status.success() {
        return Ok("cmd");
    }
    Err(AdapterError::LaunchFailed(
        "wt and cmd start both failed".to_string(),
    ))
}

/// Single-quote a string for POSIX shell embedding.
#[cfg_attr(windows, allow(dead_code))]
fn shell_single_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

#[cfg(target_os = "macos")]
fn applescript_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
#[path = "terminal_tests.rs"]
mod tests;
