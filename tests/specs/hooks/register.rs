//! Register hook specs: creation, idempotence, and the validation gate.

use crate::prelude::*;

#[test]
fn register_creates_an_active_session_record() {
    let world = World::new();
    let cwd = tempfile::tempdir().unwrap();
    world.register("a1b2c3d4e5f6g7h8", cwd.path());

    let record = world.session_record("a1b2c3d4");
    assert_eq!(record["session"], "a1b2c3d4");
    assert_eq!(record["status"], "active");
    assert_eq!(record["tool_counts"], serde_json::json!({}));
}

#[test]
fn register_twice_keeps_counters() {
    let world = World::new();
    let cwd = tempfile::tempdir().unwrap();
    world.register("a1b2c3d4e5f6g7h8", cwd.path());
    world.heartbeat("a1b2c3d4e5f6g7h8", "Bash", None);
    world.register("a1b2c3d4e5f6g7h8", cwd.path());

    let record = world.session_record("a1b2c3d4");
    assert_eq!(record["status"], "active");
    assert_eq!(record["tool_counts"]["Bash"], 1);
}

#[test]
fn every_hook_rejects_a_traversal_id() {
    let world = World::new();
    let blobs: [(&str, String); 5] = [
        ("register", r#"{"session_id": "../../bad", "cwd": "/tmp"}"#.into()),
        (
            "heartbeat",
            r#"{"session_id": "../../bad", "tool_name": "Bash"}"#.into(),
        ),
        ("drain", r#"{"session_id": "../../bad"}"#.into()),
        (
            "guard",
            r#"{"session_id": "../../bad", "tool_name": "Edit", "tool_input": {"file_path": "x"}}"#
                .into(),
        ),
        ("end", r#"{"session_id": "../../bad"}"#.into()),
    ];

    for (hook, blob) in &blobs {
        world
            .troupe()
            .args(&["hook", hook])
            .stdin(blob)
            .fails()
            .stderr_has("Invalid session_id");
    }

    // Nothing was created under the state root.
    let terminals = world.terminals();
    let session_files = std::fs::read_dir(&terminals)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .filter(|e| e.file_name().to_string_lossy().starts_with("session-"))
                .count()
        })
        .unwrap_or(0);
    assert_eq!(session_files, 0);
    assert!(!terminals.join("activity.jsonl").exists());
}

#[test]
fn register_rejects_short_ids_too() {
    let world = World::new();
    world
        .troupe()
        .args(&["hook", "register"])
        .stdin(r#"{"session_id": "abc", "cwd": "/tmp"}"#)
        .fails()
        .stderr_has("Invalid session_id");
}

#[test]
fn end_hook_closes_the_session() {
    let world = World::new();
    let cwd = tempfile::tempdir().unwrap();
    world.register("a1b2c3d4e5f6g7h8", cwd.path());

    world
        .troupe()
        .args(&["hook", "end"])
        .stdin(r#"{"session_id": "a1b2c3d4e5f6g7h8"}"#)
        .passes();

    let record = world.session_record("a1b2c3d4");
    assert_eq!(record["status"], "closed");
}

#[test]
fn malformed_hook_input_fails_without_touching_state() {
    let world = World::new();
    world
        .troupe()
        .args(&["hook", "register"])
        .stdin("this is not json")
        .fails()
        .stderr_has("bad hook input");
}
