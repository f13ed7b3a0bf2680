// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session wake.
//!
//! A wake is only ever an Enter keystroke: the message travels through
//! the inbox, so keystroke injection never carries free-form text. The
//! keystroke makes the idle session's next hook cycle fire and drain.
//! Every path here returns an error on failure and the coordinator
//! falls back to an urgent inbox message.

use crate::subprocess::{run_with_timeout, BRIDGE_TIMEOUT, TMUX_TIMEOUT};
use crate::AdapterError;
use std::time::Duration;
use tokio::process::Command;
use troupe_core::{is_safe_tty, SessionRecord};

/// Deliver an Enter keystroke to the session's terminal.
///
/// Returns the name of the path that delivered it. The fallback chain is
/// platform-ordered; a session with no usable terminal is an error and
/// the caller queues the urgent message instead.
pub async fn wake_session(
    record: &SessionRecord,
    timeout: Duration,
) -> Result<&'static str, AdapterError> {
    let mut failures: Vec<String> = Vec::new();

    if let Some(tty) = record.tty.as_deref() {
        if !is_safe_tty(tty) {
            failures.push(format!("tty {tty:?} refused by safety check"));
        } else {
            #[cfg(all(unix, not(target_os = "macos")))]
            match write_newline_to_tty(tty) {
                Ok(()) => return Ok("tty"),
                Err(e) => failures.push(format!("tty write: {e}")),
            }

            match tmux_send_enter_by_tty(tty).await {
                Ok(()) => return Ok("tmux"),
                Err(e) => failures.push(format!("tmux: {e}")),
            }
        }
    } else {
        failures.push("no tty recorded".to_string());
    }

    match bridge_send_enter(record, timeout).await {
        Ok(backend) => return Ok(backend),
        Err(e) => failures.push(format!("bridge: {e}")),
    }

    Err(AdapterError::WakeFailed(failures.join("; ")))
}

/// Direct character-device write. Only reached after the safe-TTY check;
/// the device must actually be a character device, not a regular file
/// someone parked at a tty-shaped path.
#[cfg(all(unix, not(target_os = "macos")))]
fn write_newline_to_tty(tty: &str) -> Result<(), AdapterError> {
    use std::io::Write;
    use std::os::unix::fs::FileTypeExt;

    let meta = std::fs::metadata(tty)
        .map_err(|e| AdapterError::WakeFailed(format!("stat {tty}: {e}")))?;
    if !meta.file_type().is_char_device() {
        return Err(AdapterError::WakeFailed(format!(
            "{tty} is not a character device"
        )));
    }

    let mut device = std::fs::OpenOptions::new()
        .write(true)
        .open(tty)
        .map_err(|e| AdapterError::WakeFailed(format!("open {tty}: {e}")))?;
    device
        .write_all(b"\n")
        .map_err(|e| AdapterError::WakeFailed(format!("write {tty}: {e}")))
}

/// Locate the tmux pane owning `tty` and send it Enter.
async fn tmux_send_enter_by_tty(tty: &str) -> Result<(), AdapterError> {
    let mut list = Command::new("tmux");
    list.args(["list-panes", "-a", "-F", "#{pane_tty} #{pane_id}"]);
    let output = run_with_timeout(list, TMUX_TIMEOUT, "tmux list-panes")
        .await
        .map_err(AdapterError::WakeFailed)?;
    if !output.status.success() {
        return Err(AdapterError::WakeFailed("no tmux server".to_string()));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let pane = stdout
        .lines()
        .find_map(|line| line.strip_prefix(&format!("{tty} ")))
        .ok_or_else(|| AdapterError::WakeFailed(format!("no pane on {tty}")))?
        .to_string();

    let mut send = Command::new("tmux");
    send.args(["send-keys", "-t", &pane, "Enter"]);
    let output = run_with_timeout(send, TMUX_TIMEOUT, "tmux send-keys")
        .await
        .map_err(AdapterError::WakeFailed)?;
    if !output.status.success() {
        return Err(AdapterError::WakeFailed(format!(
            "send-keys to {pane} failed"
        )));
    }
    Ok(())
}

/// Platform scripting bridge: locate the window or tab belonging to the
/// session and send Enter, bounded by the wake timeout.
#[cfg(target_os = "macos")]
async fn bridge_send_enter(
    record: &SessionRecord,
    timeout: Duration,
) -> Result<&'static str, AdapterError> {
    let tty = record
        .tty
        .as_deref()
        .ok_or_else(|| AdapterError::WakeFailed("no tty for bridge lookup".to_string()))?;

    // iTerm2 exposes sessions by tty; Terminal.app ties tabs to them.
    let script = format!(
        r#"tell application "iTerm2"
  repeat with w in windows
    repeat with t in tabs of w
      repeat with s in sessions of t
        if tty of s is "{tty}" then
          tell s to write text ""
          return "ok"
        end if
      end repeat
    end repeat
  end repeat
end tell
tell application "Terminal"
  repeat with w in windows
    repeat with t in tabs of w
      if tty of t is "{tty}" then
        do script "" in t
        return "ok"
      end if
    end repeat
  end repeat
end tell
error "session tty not found""#
    );

    let mut cmd = Command::new("osascript");
    cmd.arg("-e").arg(script);
    let output = run_with_timeout(cmd, timeout.min(BRIDGE_TIMEOUT), "osascript wake")
        .await
        .map_err(AdapterError::WakeFailed)?;
    if !output.status.success() {
        return Err(AdapterError::WakeFailed(
            String::from_utf8_lossy(&output.stderr).to_string(),
        ));
    }
    Ok("osascript")
}

#[cfg(windows)]
async fn bridge_send_enter(
    record: &SessionRecord,
    timeout: Duration,
) -> Result<&'static str, AdapterError> {
    // Activate the window titled claude-<session> and send Enter.
    let script = format!(
        "$w = New-Object -ComObject WScript.Shell; \
         if ($w.AppActivate('claude-{}')) {{ $w.SendKeys('~') }} else {{ exit 1 }}",
        record.session
    );
    let mut cmd = Command::new("powershell");
    cmd.args(["-NoProfile", "-Command", &script]);
    let output = run_with_timeout(cmd, timeout.min(BRIDGE_TIMEOUT), "powershell wake")
        .await
        .map_err(AdapterError::WakeFailed)?;
    if !output.status.success() {
        return Err(AdapterError::WakeFailed(format!(
            "window claude-{} not found",
            record.session
        )));
    }
    Ok("powershell")
}

#[cfg(all(unix, not(target_os = "macos")))]
async fn bridge_send_enter(
    _record: &SessionRecord,
    _timeout: Duration,
) -> Result<&'static str, AdapterError> {
    // No scripting bridge on this platform; the tty and tmux paths above
    // are the only delivery mechanisms.
    Err(AdapterError::WakeFailed(
        "no scripting bridge on this platform".to_string(),
    ))
}

#[cfg(test)]
#[path = "wake_tests.rs"]
mod tests;
