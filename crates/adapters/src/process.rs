// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process management.
//!
//! Workers are supervised through their pid files, so the operations
//! here take bare pids: liveness probe, tree kill, and detached spawn.
//! Children are put in their own process group at spawn so a tree kill
//! reaches the whole family.

use crate::AdapterError;
use std::path::Path;
use std::process::Stdio;

/// Whether a process with this pid is currently alive.
#[cfg(unix)]
pub fn is_alive(pid: u32) -> bool {
    let Ok(pid) = i32::try_from(pid) else {
        return false;
    };
    nix::sys::signal::kill(nix::unistd::Pid::from_raw(pid), None).is_ok()
}

#[cfg(not(unix))]
pub fn is_alive(pid: u32) -> bool {
    let output = std::process::Command::new("tasklist")
        .args(["/FI", &format!("PID eq {pid}"), "/NH"])
        .output();
    match output {
        Ok(out) => String::from_utf8_lossy(&out.stdout).contains(&pid.to_string()),
        Err(_) => false,
    }
}

/// Terminate a worker's process tree.
///
/// Returns whether the process was alive when the kill was attempted.
/// On POSIX the process group gets SIGTERM first, then the process
/// itself; Windows uses `taskkill /T`.
#[cfg(unix)]
pub fn kill_tree(pid: u32) -> Result<bool, AdapterError> {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    let raw = i32::try_from(pid)
        .map_err(|_| AdapterError::CommandFailed(format!("pid out of range: {pid}")))?;
    if !is_alive(pid) {
        return Ok(false);
    }

    // Negative pid addresses the process group.
    let _ = kill(Pid::from_raw(-raw), Signal::SIGTERM);
    let _ = kill(Pid::from_raw(raw), Signal::SIGTERM);
    Ok(true)
}

#[cfg(not(unix))]
pub fn kill_tree(pid: u32) -> Result<bool, AdapterError> {
    if !is_alive(pid) {
        return Ok(false);
    }
    std::process::Command::new("taskkill")
        .args(["/PID", &pid.to_string(), "/T", "/F"])
        .output()
        .map_err(|e| AdapterError::CommandFailed(format!("taskkill: {e}")))?;
    Ok(true)
}

/// Spawn a shell command detached in `dir`, returning the child pid.
///
/// The command is a platform launch script: `sh -c` runs it on unix,
/// `powershell -NoProfile -Command` on Windows (cmd.exe cannot express
/// the scripts' pid/trailer discipline). The child gets its own process
/// group and no inherited stdio; worker scripts redirect their own
/// output to the result file.
pub fn spawn_detached(command: &str, dir: &Path) -> Result<u32, AdapterError> {
    let mut cmd = shell_command(command);
    cmd.current_dir(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }

    let child = cmd
        .spawn()
        .map_err(|e| AdapterError::LaunchFailed(format!("spawn in {}: {}", dir.display(), e)))?;
    Ok(child.id())
}

#[cfg(unix)]
fn shell_command(command: &str) -> std::process::Command {
    let mut cmd = std::process::Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(not(unix))]
fn shell_command(command: &str) -> std::process::Command {
    let mut cmd = std::process::Command::new("powershell");
    cmd.args(["-NoProfile", "-Command"]).arg(command);
    cmd
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
