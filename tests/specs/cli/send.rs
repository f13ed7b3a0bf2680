//! Send command specs: delivery, validation, and the rate limit.

use crate::prelude::*;

#[test]
fn send_queues_a_message() {
    let world = World::new();
    let cwd = tempfile::tempdir().unwrap();
    world.register("e5f6g7h8ijkl", cwd.path());

    world
        .troupe()
        .args(&["send", "--from", "lead", "--to", "e5f6g7h8ijkl", "hello"])
        .passes()
        .stdout_has("queued for e5f6g7h8");

    let inbox = std::fs::read_to_string(world.inbox_path("e5f6g7h8")).unwrap();
    let msg: serde_json::Value = serde_json::from_str(inbox.lines().next().unwrap()).unwrap();
    assert_eq!(msg["from"], "lead");
    assert_eq!(msg["content"], "hello");
    assert_eq!(msg["priority"], "normal");
}

#[test]
fn send_flags_the_session_record() {
    let world = World::new();
    let cwd = tempfile::tempdir().unwrap();
    world.register("e5f6g7h8ijkl", cwd.path());
    world
        .troupe()
        .args(&["send", "--to", "e5f6g7h8ijkl", "hello"])
        .passes();
    assert_eq!(world.session_record("e5f6g7h8")["has_messages"], true);
}

#[test]
fn send_to_unknown_session_fails() {
    let world = World::new();
    world
        .troupe()
        .args(&["send", "--to", "deadbeef", "hello"])
        .fails()
        .stderr_has("no such session");
}

#[test]
fn send_rejects_unsafe_recipient() {
    let world = World::new();
    world
        .troupe()
        .args(&["send", "--to", "../../bad", "hello"])
        .fails()
        .stderr_has("Invalid session_id");
}

#[test]
fn send_rate_limits_a_chatty_sender() {
    let world = World::new();
    let cwd = tempfile::tempdir().unwrap();
    world.register("e5f6g7h8ijkl", cwd.path());

    // Default budget is 10 per window.
    for i in 0..10 {
        world
            .troupe()
            .args(&["send", "--to", "e5f6g7h8ijkl", &format!("m{i}")])
            .passes();
    }
    world
        .troupe()
        .args(&["send", "--to", "e5f6g7h8ijkl", "over budget"])
        .fails()
        .stderr_has("rate limited");
}

#[test]
fn wake_without_a_terminal_falls_back_to_urgent_inbox() {
    let world = World::new();
    let cwd = tempfile::tempdir().unwrap();
    world.register("e5f6g7h8ijkl", cwd.path());

    world
        .troupe()
        .args(&["wake", "e5f6g7h8ijkl", "-m", "pipeline done"])
        .passes()
        .stdout_has("urgent message queued");

    let inbox = std::fs::read_to_string(world.inbox_path("e5f6g7h8")).unwrap();
    let msg: serde_json::Value = serde_json::from_str(inbox.lines().next().unwrap()).unwrap();
    assert_eq!(msg["priority"], "urgent");
    assert_eq!(msg["content"], "[WAKE] pipeline done");
}

#[test]
fn result_reports_unknown_worker() {
    let world = World::new();
    world
        .troupe()
        .args(&["result", "ghost"])
        .fails()
        .stderr_has("not found");
}
