// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The dashboard: everything a lead needs, read straight off the state
//! store.

use super::now_ms;
use std::collections::BTreeMap;
use troupe_core::{TaskStatus, WorkerStatus};
use troupe_store::{results, sessions, tasks, StateRoot};

pub fn run() -> anyhow::Result<()> {
    let root = StateRoot::discover()?;
    let now = now_ms();

    let live = sessions::list_live(&root, now)?;
    println!("SESSIONS ({})", live.len());
    if live.is_empty() {
        println!("  (none)");
    }
    for s in &live {
        println!(
            "  {}  {:<6}  {:<20}  {:>4} tools  {:>3} files  {}{}",
            s.session,
            s.status.to_string(),
            project_label(&s.project, s.branch.as_deref()),
            s.total_tool_count(),
            s.files_touched.len(),
            ago(now, s.last_active),
            if s.has_messages { "  [mail]" } else { "" },
        );
    }

    let mut by_file: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for s in &live {
        for f in &s.files_touched {
            by_file.entry(f).or_default().push(&s.session);
        }
    }
    let conflicts: Vec<_> = by_file
        .into_iter()
        .filter(|(_, holders)| holders.len() >= 2)
        .collect();
    if !conflicts.is_empty() {
        println!();
        println!("CONFLICTS ({})", conflicts.len());
        for (file, holders) in conflicts {
            println!("  {}  <- {}", file, holders.join(", "));
        }
    }

    let workers = running_workers(&root)?;
    if !workers.is_empty() {
        println!();
        println!("WORKERS ({})", workers.len());
        for (id, status) in workers {
            println!("  {id}  {status}");
        }
    }

    let open: Vec<_> = tasks::list(&root)?
        .into_iter()
        .filter(|t| t.status != TaskStatus::Completed)
        .collect();
    if !open.is_empty() {
        println!();
        println!("TASKS ({})", open.len());
        for t in open {
            let assignee = t.assignee.as_deref().unwrap_or("-");
            println!("  {}  {:<11}  {:<9}  {}", t.id, t.status.to_string(), assignee, t.subject);
        }
    }

    Ok(())
}

fn project_label(project: &str, branch: Option<&str>) -> String {
    match branch {
        Some(branch) => format!("{project}@{branch}"),
        None => project.to_string(),
    }
}

/// Workers with a meta file but no terminal status yet.
fn running_workers(root: &StateRoot) -> anyhow::Result<Vec<(String, WorkerStatus)>> {
    let dir = root.results_dir();
    let mut out = Vec::new();
    for entry in std::fs::read_dir(&dir)? {
        let name = entry?.file_name();
        let name = name.to_string_lossy();
        let Some(id) = name.strip_suffix(".meta.json") else {
            continue;
        };
        if results::read_done(root, id).ok().flatten().is_some() {
            continue;
        }
        // Both worker and pipeline metas are shown; probe is worker-shaped.
        let (status, _) = troupe_engine::probe_status(root, id)
            .unwrap_or((WorkerStatus::Unknown, None));
        out.push((id.to_string(), status));
    }
    out.sort();
    Ok(out)
}

fn ago(now: u64, then: u64) -> String {
    let secs = now.saturating_sub(then) / 1000;
    if secs < 60 {
        format!("{secs}s ago")
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else {
        format!("{}h ago", secs / 3600)
    }
}
