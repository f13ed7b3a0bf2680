// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shell-equivalent of `coord_get_result`.

use troupe_engine::worker_report;
use troupe_store::StateRoot;

pub fn run(task_id: &str, tail: usize) -> anyhow::Result<()> {
    let root = StateRoot::discover()?;
    let report = worker_report(&root, task_id, tail)?;

    print!("{} {}", report.task_id, report.status);
    if let Some(code) = report.exit_code {
        print!(" (exit {code})");
    }
    println!();
    if !report.tail.is_empty() {
        println!("{}", report.tail);
    }
    Ok(())
}
