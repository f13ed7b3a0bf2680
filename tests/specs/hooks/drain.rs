//! Drain hook specs: inbox delivery and completion routing.

use crate::prelude::*;

fn seed_done_worker(world: &World, task_id: &str, notify: Option<&str>) {
    std::fs::create_dir_all(world.terminals().join("results")).unwrap();
    let notify_field = match notify {
        Some(id) => format!(r#", "notify_session_id": "{id}""#),
        None => String::new(),
    };
    std::fs::write(
        world.results_file(&format!("{task_id}.meta.json")),
        format!(
            r#"{{"task_id": "{task_id}", "directory": "/tmp", "prompt": "p",
                "model": "sonnet", "spawned": 1, "status": "running"{notify_field}}}"#
        ),
    )
    .unwrap();
    std::fs::write(
        world.results_file(&format!("{task_id}.meta.json.done")),
        format!(r#"{{"status": "completed", "finished": 2, "task_id": "{task_id}"}}"#),
    )
    .unwrap();
}

fn drain(world: &World, session_id: &str) -> crate::prelude::RunAssert {
    world
        .troupe()
        .args(&["hook", "drain"])
        .stdin(&format!(r#"{{"session_id": "{session_id}"}}"#))
        .passes()
}

#[test]
fn send_then_drain_delivers_content_and_priority() {
    let world = World::new();
    let cwd = tempfile::tempdir().unwrap();
    world.register("e5f6g7h8ijkl", cwd.path());

    world
        .troupe()
        .args(&[
            "send",
            "--from",
            "lead",
            "--to",
            "e5f6g7h8ijkl",
            "--urgent",
            "stop editing auth.ts",
        ])
        .passes();

    drain(&world, "e5f6g7h8ijkl")
        .stderr_has("[INBOX] 1 message(s) for e5f6g7h8:")
        .stderr_has("[urgent] from lead: stop editing auth.ts");

    // Inbox file is gone after the drain.
    assert!(!world.inbox_path("e5f6g7h8").exists());

    // And a second drain is silent.
    drain(&world, "e5f6g7h8ijkl").stderr_lacks("[INBOX]");
}

#[test]
fn routed_completion_reaches_only_the_notify_session() {
    let world = World::new();
    seed_done_worker(&world, "WROUTE", Some("abcd1234"));

    // A different session drains: nothing claimed, nothing printed.
    drain(&world, "efgh5678ijkl9999").stderr_lacks("WROUTE");
    assert!(!world.results_file("WROUTE.reported").exists());

    // The addressed session drains: the completion is queued for it.
    drain(&world, "abcd1234efgh5678");
    assert!(world.results_file("WROUTE.reported").exists());
    let inbox = std::fs::read_to_string(world.inbox_path("abcd1234")).unwrap();
    assert!(inbox.contains("[WORKER COMPLETED] WROUTE"));

    // Next drain surfaces it to the model.
    drain(&world, "abcd1234efgh5678").stderr_has("[WORKER COMPLETED] WROUTE");
}

#[test]
fn untargeted_completion_is_preserved() {
    let world = World::new();
    seed_done_worker(&world, "WUNTARGETED", None);

    drain(&world, "abcd1234efgh5678");
    drain(&world, "efgh5678ijkl9999");

    assert!(!world.results_file("WUNTARGETED.reported").exists());
    assert!(!world.inbox_path("abcd1234").exists());
}

#[test]
fn completion_includes_the_output_tail() {
    let world = World::new();
    seed_done_worker(&world, "WTAIL", Some("abcd1234"));
    std::fs::write(
        world.results_file("WTAIL.txt"),
        "noise\nfinal answer: 42\n",
    )
    .unwrap();

    drain(&world, "abcd1234efgh5678");
    let inbox = std::fs::read_to_string(world.inbox_path("abcd1234")).unwrap();
    assert!(inbox.contains("final answer: 42"));
}
