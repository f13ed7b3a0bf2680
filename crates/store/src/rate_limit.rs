// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-(sender, recipient) message rate limits.
//!
//! Counters live in `rate-limits/<sender>.json` and are mutated only
//! under the file's lock, so concurrent RPCs cannot lose updates. Being a
//! file, the limiter survives coordinator restarts.

use crate::fs::{read_json, safe_write_json};
use crate::lock::with_lock;
use crate::{StateRoot, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One recipient's window state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Window {
    pub window_start: u64,
    pub count: u32,
}

/// `rate-limits/<sender>.json`: recipient → window.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SenderLimits {
    #[serde(default)]
    pub recipients: HashMap<String, Window>,
}

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    /// Budget exhausted; retry after the window rolls.
    Limited { retry_after_ms: u64 },
}

/// Check and consume one send from `sender` to `recipient`.
///
/// A fixed window of `window_ms` admits `max_per_window` sends. The
/// check and increment happen under the sender file's lock.
pub fn check_and_count(
    root: &StateRoot,
    sender: &str,
    recipient: &str,
    now: u64,
    max_per_window: u32,
    window_ms: u64,
) -> Result<Decision, StoreError> {
    let path = root.rate_limit_path(sender);
    with_lock(&path, || {
        let mut limits: SenderLimits = read_json(&path)?.unwrap_or_default();
        let window = limits.recipients.entry(recipient.to_string()).or_default();

        if now.saturating_sub(window.window_start) >= window_ms {
            window.window_start = now;
            window.count = 0;
        }

        if window.count >= max_per_window {
            let retry_after_ms = (window.window_start + window_ms).saturating_sub(now);
            return Ok(Decision::Limited { retry_after_ms });
        }

        window.count += 1;
        safe_write_json(&path, &limits)?;
        Ok(Decision::Allowed)
    })
}

#[cfg(test)]
#[path = "rate_limit_tests.rs"]
mod tests;
