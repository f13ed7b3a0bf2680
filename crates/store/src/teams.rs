// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Team bookkeeping.

use crate::fs::{read_json, safe_write_json};
use crate::lock::with_lock;
use crate::{StateRoot, StoreError};
use troupe_core::TeamRecord;

pub fn load(root: &StateRoot, name: &str) -> Result<Option<TeamRecord>, StoreError> {
    read_json(&root.team_path(name))
}

/// Create a team; `Ok(false)` when the name is already taken.
pub fn create(root: &StateRoot, team: &TeamRecord) -> Result<bool, StoreError> {
    let path = root.team_path(&team.name);
    with_lock(&path, || {
        if path.exists() {
            return Ok(false);
        }
        safe_write_json(&path, team)?;
        Ok(true)
    })
}

pub fn list(root: &StateRoot) -> Result<Vec<TeamRecord>, StoreError> {
    let dir = root.teams_dir();
    let entries = std::fs::read_dir(&dir).map_err(|e| StoreError::io(&dir, e))?;
    let mut teams = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| StoreError::io(&dir, e))?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if !name.ends_with(".json") {
            continue;
        }
        match read_json::<TeamRecord>(&entry.path()) {
            Ok(Some(team)) => teams.push(team),
            Ok(None) => {}
            Err(e) => eprintln!("troupe: skipping unreadable {}: {}", name, e),
        }
    }
    teams.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(teams)
}
