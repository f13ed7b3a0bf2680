// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker and pipeline result artifacts.
//!
//! The supervisor writes the meta file before the child exists; the child
//! owns its pid file, output, and done marker. Nothing here deletes
//! artifacts; completions stay collectable.

use crate::fs::{read_json, safe_write_json};
use crate::{StateRoot, StoreError};
use std::fs::OpenOptions;
use std::path::PathBuf;
use troupe_core::{PipelineMeta, WorkerDone, WorkerMeta};

/// Paths of one worker's artifact family.
#[derive(Debug, Clone)]
pub struct ResultPaths {
    pub meta: PathBuf,
    pub done: PathBuf,
    pub pid: PathBuf,
    pub prompt: PathBuf,
    pub output: PathBuf,
    pub reported: PathBuf,
    pub log: PathBuf,
}

/// Artifact paths for a validated task or pipeline id.
pub fn paths(root: &StateRoot, id: &str) -> ResultPaths {
    let dir = root.results_dir();
    ResultPaths {
        meta: dir.join(format!("{id}.meta.json")),
        done: dir.join(format!("{id}.meta.json.done")),
        pid: dir.join(format!("{id}.pid")),
        prompt: dir.join(format!("{id}.prompt")),
        output: dir.join(format!("{id}.txt")),
        reported: dir.join(format!("{id}.reported")),
        log: dir.join(format!("{id}.log")),
    }
}

pub fn write_meta(root: &StateRoot, meta: &WorkerMeta) -> Result<(), StoreError> {
    safe_write_json(&paths(root, &meta.task_id).meta, meta)
}

pub fn read_meta(root: &StateRoot, id: &str) -> Result<Option<WorkerMeta>, StoreError> {
    read_json(&paths(root, id).meta)
}

pub fn read_done(root: &StateRoot, id: &str) -> Result<Option<WorkerDone>, StoreError> {
    read_json(&paths(root, id).done)
}

pub fn write_pipeline_meta(root: &StateRoot, meta: &PipelineMeta) -> Result<(), StoreError> {
    safe_write_json(&paths(root, &meta.pipeline_id).meta, meta)
}

pub fn read_pipeline_meta(root: &StateRoot, id: &str) -> Result<Option<PipelineMeta>, StoreError> {
    read_json(&paths(root, id).meta)
}

/// The child's recorded pid, if its pid file is still present.
pub fn read_pid(root: &StateRoot, id: &str) -> Result<Option<u32>, StoreError> {
    let path = paths(root, id).pid;
    match std::fs::read_to_string(&path) {
        Ok(s) => Ok(s.trim().parse().ok()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::io(&path, e)),
    }
}

/// Atomically claim the completion-reported marker.
///
/// Exclusive create: exactly one drainer wins and delivers the
/// notification; everyone else sees `false`. The marker is monotonic.
pub fn claim_reported(root: &StateRoot, id: &str) -> Result<bool, StoreError> {
    let path = paths(root, id).reported;
    match OpenOptions::new().create_new(true).write(true).open(&path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(StoreError::io(&path, e)),
    }
}

pub fn is_reported(root: &StateRoot, id: &str) -> bool {
    paths(root, id).reported.exists()
}

/// Ids of every worker with a done marker, reported or not.
pub fn finished_ids(root: &StateRoot) -> Result<Vec<String>, StoreError> {
    let dir = root.results_dir();
    let entries = std::fs::read_dir(&dir).map_err(|e| StoreError::io(&dir, e))?;
    let mut ids = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| StoreError::io(&dir, e))?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if let Some(id) = name.strip_suffix(".meta.json.done") {
            ids.push(id.to_string());
        }
    }
    ids.sort();
    Ok(ids)
}

/// Last `lines` lines of the worker's captured output.
pub fn tail_output(root: &StateRoot, id: &str, lines: usize) -> Result<String, StoreError> {
    let path = paths(root, id).output;
    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(String::new()),
        Err(e) => return Err(StoreError::io(&path, e)),
    };
    let all: Vec<&str> = content.lines().collect();
    let start = all.len().saturating_sub(lines);
    Ok(all[start..].join("\n"))
}

#[cfg(test)]
#[path = "results_tests.rs"]
mod tests;
