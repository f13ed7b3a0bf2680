// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Activity log.

use crate::fs::{append_json_line, read_jsonl};
use crate::{StateRoot, StoreError};
use troupe_core::ActivityEvent;

/// Append one event under the log's lock. The log is append-only; head
/// truncation belongs to an external compaction task.
pub fn append(root: &StateRoot, event: &ActivityEvent) -> Result<(), StoreError> {
    append_json_line(&root.activity_path(), event)
}

/// Read the whole log, skipping malformed lines.
pub fn read(root: &StateRoot) -> Result<Vec<ActivityEvent>, StoreError> {
    read_jsonl(&root.activity_path())
}
