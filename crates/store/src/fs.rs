// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem primitives.
//!
//! Four operations and nothing more: atomic whole-file write, locked
//! append, best-effort JSON/JSONL reads, and restricted directory
//! creation. Read-modify-write lives in [`crate::lock`].

use crate::lock::lock_file_blocking;
use crate::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// Create a directory (and parents) with owner-only permissions.
pub fn ensure_dir(dir: &Path) -> Result<(), StoreError> {
    if dir.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;
    restrict_dir(dir)?;
    Ok(())
}

#[cfg(unix)]
fn restrict_dir(dir: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o700))
        .map_err(|e| StoreError::io(dir, e))
}

#[cfg(not(unix))]
fn restrict_dir(dir: &Path) -> Result<(), StoreError> {
    // No POSIX modes: break ACL inheritance and grant only the current
    // user. Best-effort; a failure here must not brick the store.
    let user = std::env::var("USERNAME").unwrap_or_default();
    if !user.is_empty() {
        let _ = std::process::Command::new("icacls")
            .arg(dir)
            .args(["/inheritance:r", "/grant:r"])
            .arg(format!("{user}:(OI)(CI)F"))
            .output();
    }
    Ok(())
}

#[cfg(unix)]
fn restrict_file(file: &File, path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(0o600))
        .map_err(|e| StoreError::io(path, e))
}

#[cfg(not(unix))]
fn restrict_file(_file: &File, _path: &Path) -> Result<(), StoreError> {
    // Files inherit the directory ACL set by restrict_dir.
    Ok(())
}

/// Write `bytes` to `path + ".tmp"` and rename over `path`.
///
/// Parent directories are created restricted if absent. Readers never see
/// a partial file; the last writer wins.
pub fn safe_write(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }

    let tmp = tmp_path(path);
    {
        let mut file = File::create(&tmp).map_err(|e| StoreError::io(&tmp, e))?;
        restrict_file(&file, &tmp)?;
        file.write_all(bytes).map_err(|e| StoreError::io(&tmp, e))?;
    }
    std::fs::rename(&tmp, path).map_err(|e| StoreError::io(path, e))
}

/// Serialize `value` as pretty JSON and [`safe_write`] it.
pub fn safe_write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let mut bytes = serde_json::to_vec_pretty(value).map_err(|e| StoreError::json(path, e))?;
    bytes.push(b'\n');
    safe_write(path, &bytes)
}

fn tmp_path(path: &Path) -> std::path::PathBuf {
    let mut s = path.as_os_str().to_os_string();
    s.push(".tmp");
    std::path::PathBuf::from(s)
}

/// Append one `\n`-terminated record under an exclusive lock on the file.
///
/// The lock is held only for the write; contention windows are
/// microseconds. Concurrent appenders serialize, so the file is always a
/// sequence of whole records.
pub fn append_line(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| StoreError::io(path, e))?;
    restrict_file(&file, path)?;

    let guard = lock_file_blocking(&file, path)?;
    file.write_all(bytes).map_err(|e| StoreError::io(path, e))?;
    if !bytes.ends_with(b"\n") {
        file.write_all(b"\n").map_err(|e| StoreError::io(path, e))?;
    }
    file.flush().map_err(|e| StoreError::io(path, e))?;
    drop(guard);
    Ok(())
}

/// Serialize `value` as a single JSON line and [`append_line`] it.
pub fn append_json_line<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec(value).map_err(|e| StoreError::json(path, e))?;
    append_line(path, &bytes)
}

/// Read and parse a JSON file. `Ok(None)` when the file does not exist.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StoreError::io(path, e)),
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| StoreError::json(path, e))
}

/// Read a JSONL file, skipping malformed lines with a stderr warning.
///
/// Missing file reads as empty. Never fails the caller over one bad
/// line; a torn record must not take down every future drain.
pub fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(StoreError::io(path, e)),
    };

    let mut records = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| StoreError::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                eprintln!(
                    "troupe: skipping malformed line in {}: {}",
                    path.display(),
                    e
                );
            }
        }
    }
    Ok(records)
}

#[cfg(test)]
#[path = "fs_tests.rs"]
mod tests;
