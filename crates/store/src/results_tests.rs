// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use troupe_core::{StepSpec, WorkerStatus};

fn root() -> (tempfile::TempDir, StateRoot) {
    let tmp = tempfile::tempdir().unwrap();
    let root = StateRoot::open(tmp.path()).unwrap();
    (tmp, root)
}

#[test]
fn meta_roundtrip() {
    let (_tmp, root) = root();
    let meta = WorkerMeta::new("WROUTE", "/tmp/w", "prompt text", "sonnet", 9);
    write_meta(&root, &meta).unwrap();
    let loaded = read_meta(&root, "WROUTE").unwrap().unwrap();
    assert_eq!(loaded.task_id, "WROUTE");
    assert_eq!(loaded.status, WorkerStatus::Running);
}

#[test]
fn read_done_absent_then_present() {
    let (_tmp, root) = root();
    assert!(read_done(&root, "t1").unwrap().is_none());
    let done = WorkerDone {
        status: WorkerStatus::Completed,
        finished: 100,
        task_id: "t1".into(),
        exit_code: Some(0),
    };
    crate::fs::safe_write_json(&paths(&root, "t1").done, &done).unwrap();
    assert_eq!(read_done(&root, "t1").unwrap(), Some(done));
}

#[test]
fn read_pid_parses_and_tolerates_absence() {
    let (_tmp, root) = root();
    assert_eq!(read_pid(&root, "t1").unwrap(), None);
    std::fs::write(paths(&root, "t1").pid, "12345\n").unwrap();
    assert_eq!(read_pid(&root, "t1").unwrap(), Some(12345));
    std::fs::write(paths(&root, "t1").pid, "garbage").unwrap();
    assert_eq!(read_pid(&root, "t1").unwrap(), None);
}

#[test]
fn claim_reported_is_exclusive() {
    let (_tmp, root) = root();
    assert!(claim_reported(&root, "WROUTE").unwrap());
    assert!(!claim_reported(&root, "WROUTE").unwrap());
    assert!(is_reported(&root, "WROUTE"));
}

#[test]
fn claim_reported_races_have_one_winner() {
    let (_tmp, root) = root();
    let winners: usize = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let root = root.clone();
                scope.spawn(move || claim_reported(&root, "shared").unwrap())
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count()
    });
    assert_eq!(winners, 1);
}

#[test]
fn finished_ids_lists_done_markers_only() {
    let (_tmp, root) = root();
    std::fs::write(paths(&root, "a").done, "{}").unwrap();
    std::fs::write(paths(&root, "b").meta, "{}").unwrap();
    std::fs::write(paths(&root, "c").done, "{}").unwrap();
    assert_eq!(finished_ids(&root).unwrap(), vec!["a", "c"]);
}

#[test]
fn tail_output_returns_last_lines() {
    let (_tmp, root) = root();
    let body: String = (0..50).map(|i| format!("line {i}\n")).collect();
    std::fs::write(paths(&root, "t1").output, body).unwrap();
    let tail = tail_output(&root, "t1", 3).unwrap();
    assert_eq!(tail, "line 47\nline 48\nline 49");
}

#[test]
fn tail_output_missing_is_empty() {
    let (_tmp, root) = root();
    assert_eq!(tail_output(&root, "t1", 10).unwrap(), "");
}

#[test]
fn pipeline_meta_roundtrip() {
    let (_tmp, root) = root();
    let steps = vec![StepSpec {
        name: "plan".into(),
        prompt: "p".into(),
        directory: None,
    }];
    let meta = PipelineMeta::new("rel-1", "/tmp", &steps, 5);
    write_pipeline_meta(&root, &meta).unwrap();
    let loaded = read_pipeline_meta(&root, "rel-1").unwrap().unwrap();
    assert_eq!(loaded.steps[0].task_id, "rel-1-0-plan");
}
