// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use troupe_core::session::STALE_AFTER_MS;
use troupe_core::SessionRecord;

fn root() -> (tempfile::TempDir, StateRoot) {
    let tmp = tempfile::tempdir().unwrap();
    let root = StateRoot::open(tmp.path()).unwrap();
    (tmp, root)
}

fn seed(root: &StateRoot, short_id: &str, now: u64) {
    with_session(root, short_id, |_| {
        Ok((Some(SessionRecord::new(short_id, "/tmp/p", now)), ()))
    })
    .unwrap();
}

#[test]
fn load_missing_is_none() {
    let (_tmp, root) = root();
    assert!(load(&root, "a1b2c3d4").unwrap().is_none());
}

#[test]
fn with_session_creates_and_updates() {
    let (_tmp, root) = root();
    seed(&root, "a1b2c3d4", 100);

    with_session(&root, "a1b2c3d4", |current| {
        let mut record = current.unwrap();
        record.record_tool("Bash", None, 200);
        Ok((Some(record), ()))
    })
    .unwrap();

    let record = load(&root, "a1b2c3d4").unwrap().unwrap();
    assert_eq!(record.tool_counts.get("Bash"), Some(&1));
    assert_eq!(record.last_active, 200);
}

#[test]
fn with_session_none_leaves_file_untouched() {
    let (_tmp, root) = root();
    seed(&root, "a1b2c3d4", 100);
    with_session(&root, "a1b2c3d4", |_| Ok((None, ()))).unwrap();
    let record = load(&root, "a1b2c3d4").unwrap().unwrap();
    assert_eq!(record.last_active, 100);
}

#[test]
fn concurrent_updates_lose_nothing() {
    let (_tmp, root) = root();
    seed(&root, "a1b2c3d4", 0);

    let threads: Vec<_> = (0..10)
        .map(|_| {
            let root = root.clone();
            std::thread::spawn(move || {
                for i in 0..10 {
                    with_session(&root, "a1b2c3d4", |current| {
                        let mut record = current.unwrap();
                        record.record_tool("Edit", Some("src/auth.ts"), i);
                        Ok((Some(record), ()))
                    })
                    .unwrap();
                }
            })
        })
        .collect();
    for t in threads {
        t.join().unwrap();
    }

    let record = load(&root, "a1b2c3d4").unwrap().unwrap();
    assert_eq!(record.total_tool_count(), 100);
    assert_eq!(record.files_touched, vec!["src/auth.ts"]);
}

#[test]
fn list_returns_only_session_files() {
    let (_tmp, root) = root();
    seed(&root, "a1b2c3d4", 1);
    seed(&root, "e5f6g7h8", 2);
    std::fs::write(root.dir().join("activity.jsonl"), "").unwrap();
    let sessions = list(&root).unwrap();
    let ids: Vec<&str> = sessions.iter().map(|s| s.session.as_str()).collect();
    assert_eq!(ids, vec!["a1b2c3d4", "e5f6g7h8"]);
}

#[test]
fn list_live_omits_closed() {
    let (_tmp, root) = root();
    seed(&root, "a1b2c3d4", 1);
    seed(&root, "e5f6g7h8", 1);
    mark_status(&root, "e5f6g7h8", SessionStatus::Closed).unwrap();
    let live = list_live(&root, 2).unwrap();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].session, "a1b2c3d4");
}

#[test]
fn list_live_persists_stale_transition() {
    let (_tmp, root) = root();
    seed(&root, "a1b2c3d4", 1000);
    let live = list_live(&root, 1000 + STALE_AFTER_MS + 1).unwrap();
    assert_eq!(live[0].status, SessionStatus::Stale);
    // Persisted, not just reported.
    let record = load(&root, "a1b2c3d4").unwrap().unwrap();
    assert_eq!(record.status, SessionStatus::Stale);
}

#[test]
fn closed_is_terminal_for_mark_status() {
    let (_tmp, root) = root();
    seed(&root, "a1b2c3d4", 1);
    mark_status(&root, "a1b2c3d4", SessionStatus::Closed).unwrap();
    mark_status(&root, "a1b2c3d4", SessionStatus::Active).unwrap();
    let record = load(&root, "a1b2c3d4").unwrap().unwrap();
    assert_eq!(record.status, SessionStatus::Closed);
}

#[test]
fn has_messages_flag_roundtrip() {
    let (_tmp, root) = root();
    seed(&root, "a1b2c3d4", 1);
    set_has_messages(&root, "a1b2c3d4", true).unwrap();
    assert!(load(&root, "a1b2c3d4").unwrap().unwrap().has_messages);
    set_has_messages(&root, "a1b2c3d4", false).unwrap();
    assert!(!load(&root, "a1b2c3d4").unwrap().unwrap().has_messages);
}
