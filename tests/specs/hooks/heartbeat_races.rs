//! Heartbeat concurrency specs: no lost updates under parallel hooks.

use crate::prelude::*;

#[test]
fn hundred_concurrent_heartbeats_lose_nothing() {
    let world = World::new();
    let cwd = tempfile::tempdir().unwrap();
    world.register("a1b2c3d4e5f6g7h8", cwd.path());

    // 100 heartbeat processes with mixed tools, all in flight together.
    let tools = ["Edit", "Write", "Bash"];
    let mut children = Vec::new();
    for i in 0..100 {
        let tool = tools[i % 3];
        let tool_input = if tool == "Bash" {
            "{}".to_string()
        } else {
            format!(r#"{{"file_path": "src/f{}.rs"}}"#, i % 5)
        };
        let child = world
            .troupe()
            .args(&["hook", "heartbeat"])
            .stdin(&format!(
                r#"{{"session_id": "a1b2c3d4e5f6g7h8", "tool_name": "{tool}", "tool_input": {tool_input}}}"#
            ))
            .spawn_concurrent();
        children.push(child);
    }
    for mut child in children {
        let status = child.wait().unwrap();
        assert!(status.success(), "a heartbeat hook failed");
    }

    // Counts sum to exactly 100: no lost read-modify-writes.
    let record = world.session_record("a1b2c3d4");
    let total: u64 = record["tool_counts"]
        .as_object()
        .unwrap()
        .values()
        .map(|v| v.as_u64().unwrap())
        .sum();
    assert_eq!(total, 100);

    // files_touched holds each path at most once.
    let files: Vec<&str> = record["files_touched"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    let mut deduped = files.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(files.len(), deduped.len());
    assert!(files.len() <= 5);

    // recent_ops holds the most recent 10.
    assert_eq!(record["recent_ops"].as_array().unwrap().len(), 10);

    // The activity log has one well-formed line per heartbeat.
    let log = std::fs::read_to_string(world.terminals().join("activity.jsonl")).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 100);
    for line in lines {
        let event: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(event["session"], "a1b2c3d4");
    }
}

#[test]
fn heartbeats_from_two_sessions_interleave_in_one_log() {
    let world = World::new();
    let cwd = tempfile::tempdir().unwrap();
    world.register("a1b2c3d4e5f6g7h8", cwd.path());
    world.register("e5f6g7h8ijklmnop", cwd.path());

    let mut children = Vec::new();
    for i in 0..20 {
        let session = if i % 2 == 0 {
            "a1b2c3d4e5f6g7h8"
        } else {
            "e5f6g7h8ijklmnop"
        };
        children.push(
            world
                .troupe()
                .args(&["hook", "heartbeat"])
                .stdin(&format!(
                    r#"{{"session_id": "{session}", "tool_name": "Bash", "tool_input": {{}}}}"#
                ))
                .spawn_concurrent(),
        );
    }
    for mut child in children {
        assert!(child.wait().unwrap().success());
    }

    let log = std::fs::read_to_string(world.terminals().join("activity.jsonl")).unwrap();
    assert_eq!(log.lines().count(), 20);
    assert_eq!(world.session_record("a1b2c3d4")["tool_counts"]["Bash"], 10);
    assert_eq!(world.session_record("e5f6g7h8")["tool_counts"]["Bash"], 10);
}
