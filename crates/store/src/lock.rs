// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Advisory locking.
//!
//! The only synchronization in the core: an exclusive advisory file lock
//! with a bounded acquire timeout, plus a directory-lock fallback for
//! filesystems where advisory locks are unsupported (some network
//! mounts). Lock scopes are per-file and short; nothing holds a lock
//! across another operation.

use crate::env;
use crate::fs::ensure_dir;
use crate::StoreError;
use fs2::FileExt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

/// Poll interval while waiting for a contended lock.
const LOCK_POLL: Duration = Duration::from_millis(10);

/// A directory lock older than this is presumed abandoned and reclaimed.
const STALE_DIR_LOCK: Duration = Duration::from_secs(60);

/// Held advisory lock; released on drop.
pub struct LockGuard {
    inner: GuardInner,
}

enum GuardInner {
    Flock(File),
    Dir(PathBuf),
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        match &self.inner {
            GuardInner::Flock(file) => {
                let _ = FileExt::unlock(file);
            }
            GuardInner::Dir(path) => {
                let _ = std::fs::remove_dir(path);
            }
        }
    }
}

/// Lock an already-open file, waiting up to the configured timeout.
pub(crate) fn lock_file_blocking(file: &File, path: &Path) -> Result<LockGuard, StoreError> {
    let deadline = Instant::now() + env::lock_timeout();
    loop {
        // UFCS: newer std has an inherent File::try_lock_exclusive with a
        // different error type; we want fs2's.
        match FileExt::try_lock_exclusive(file) {
            Ok(()) => {
                let clone = file.try_clone().map_err(|e| StoreError::io(path, e))?;
                return Ok(LockGuard {
                    inner: GuardInner::Flock(clone),
                });
            }
            Err(e) if is_contended(&e) => {
                if Instant::now() >= deadline {
                    return Err(StoreError::LockTimeout(path.display().to_string()));
                }
                std::thread::sleep(LOCK_POLL);
            }
            Err(e) => {
                // Advisory locks unsupported here; fall through to the
                // directory lock.
                tracing::warn!(path = %path.display(), error = %e, "flock unavailable, using dir lock");
                return dir_lock(path, deadline);
            }
        }
    }
}

fn is_contended(e: &std::io::Error) -> bool {
    e.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

/// Acquire an exclusive lock guarding `path` (which need not exist),
/// run `f`, release.
///
/// The lock lives in a `<path>.lock` sidecar so the guarded file itself
/// can be created, replaced, or deleted while locked.
pub fn with_lock<T>(
    path: &Path,
    f: impl FnOnce() -> Result<T, StoreError>,
) -> Result<T, StoreError> {
    let sidecar = sidecar_path(path);
    if let Some(parent) = sidecar.parent() {
        ensure_dir(parent)?;
    }
    let file = File::create(&sidecar).map_err(|e| StoreError::io(&sidecar, e))?;
    let guard = lock_file_blocking(&file, &sidecar)?;
    let result = f();
    drop(guard);
    result
}

fn sidecar_path(path: &Path) -> PathBuf {
    let mut s = path.as_os_str().to_os_string();
    s.push(".lock");
    PathBuf::from(s)
}

/// Directory-lock fallback: `mkdir <path>.lock.d` is atomic everywhere.
/// Contenders back off until the deadline; a lock directory older than
/// [`STALE_DIR_LOCK`] is forcibly reclaimed.
fn dir_lock(path: &Path, deadline: Instant) -> Result<LockGuard, StoreError> {
    let lock_dir = dir_lock_path(path);
    loop {
        match std::fs::create_dir(&lock_dir) {
            Ok(()) => {
                return Ok(LockGuard {
                    inner: GuardInner::Dir(lock_dir),
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                reclaim_if_stale(&lock_dir);
                if Instant::now() >= deadline {
                    return Err(StoreError::LockTimeout(path.display().to_string()));
                }
                std::thread::sleep(LOCK_POLL);
            }
            Err(e) => return Err(StoreError::io(&lock_dir, e)),
        }
    }
}

fn dir_lock_path(path: &Path) -> PathBuf {
    let mut s = path.as_os_str().to_os_string();
    s.push(".lock.d");
    PathBuf::from(s)
}

fn reclaim_if_stale(lock_dir: &Path) {
    let Ok(meta) = std::fs::metadata(lock_dir) else {
        return;
    };
    let Ok(modified) = meta.modified() else {
        return;
    };
    let age = SystemTime::now()
        .duration_since(modified)
        .unwrap_or(Duration::ZERO);
    if age > STALE_DIR_LOCK {
        tracing::warn!(path = %lock_dir.display(), "reclaiming stale lock dir");
        let _ = std::fs::remove_dir(lock_dir);
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
