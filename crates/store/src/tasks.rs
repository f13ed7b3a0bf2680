// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task board accessors.

use crate::fs::{read_json, safe_write_json};
use crate::lock::with_lock;
use crate::{StateRoot, StoreError};
use std::collections::HashMap;
use troupe_core::TaskRecord;

pub fn load(root: &StateRoot, task_id: &str) -> Result<Option<TaskRecord>, StoreError> {
    read_json(&root.task_path(task_id))
}

/// Create a task; `Ok(false)` when the id is already taken.
pub fn create(root: &StateRoot, task: &TaskRecord) -> Result<bool, StoreError> {
    let path = root.task_path(&task.id);
    with_lock(&path, || {
        if path.exists() {
            return Ok(false);
        }
        safe_write_json(&path, task)?;
        Ok(true)
    })
}

/// Read-modify-write a task under its lock. `Ok(None)` when absent.
pub fn update<T>(
    root: &StateRoot,
    task_id: &str,
    f: impl FnOnce(TaskRecord) -> Result<(TaskRecord, T), StoreError>,
) -> Result<Option<T>, StoreError> {
    let path = root.task_path(task_id);
    with_lock(&path, || {
        let Some(task) = read_json::<TaskRecord>(&path)? else {
            return Ok(None);
        };
        let (updated, out) = f(task)?;
        safe_write_json(&path, &updated)?;
        Ok(Some(out))
    })
}

pub fn list(root: &StateRoot) -> Result<Vec<TaskRecord>, StoreError> {
    let dir = root.tasks_dir();
    let entries = std::fs::read_dir(&dir).map_err(|e| StoreError::io(&dir, e))?;
    let mut tasks = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| StoreError::io(&dir, e))?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if !name.ends_with(".json") {
            continue;
        }
        match read_json::<TaskRecord>(&entry.path()) {
            Ok(Some(task)) => tasks.push(task),
            Ok(None) => {}
            Err(e) => eprintln!("troupe: skipping unreadable {}: {}", name, e),
        }
    }
    tasks.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(tasks)
}

/// The whole board as a map, for dependency-cycle checks.
pub fn board(root: &StateRoot) -> Result<HashMap<String, TaskRecord>, StoreError> {
    Ok(list(root)?
        .into_iter()
        .map(|t| (t.id.clone(), t))
        .collect())
}

#[cfg(test)]
#[path = "tasks_tests.rs"]
mod tests;
