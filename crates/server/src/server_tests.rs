// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::{json, Value};

async fn roundtrip(requests: &[Value]) -> (tempfile::TempDir, Vec<Value>) {
    let tmp = tempfile::tempdir().unwrap();
    let root = StateRoot::open(tmp.path()).unwrap();
    let config = Config::load(&root).unwrap();
    let server = Server::new(Ctx::new(root, config));

    let input: String = requests.iter().map(|r| format!("{r}\n")).collect();
    let mut output = std::io::Cursor::new(Vec::new());
    server.run(input.as_bytes(), &mut output).await.unwrap();

    let responses = String::from_utf8(output.into_inner())
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    (tmp, responses)
}

#[tokio::test]
async fn initialize_handshake() {
    let (_tmp, responses) = roundtrip(&[json!({
        "jsonrpc": "2.0", "id": 1, "method": "initialize",
        "params": {"protocolVersion": "2024-11-05", "capabilities": {}}
    })])
    .await;
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["id"], 1);
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "troupe");
}

#[tokio::test]
async fn notifications_get_no_response() {
    let (_tmp, responses) = roundtrip(&[
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        json!({"jsonrpc": "2.0", "id": 2, "method": "ping"}),
    ])
    .await;
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["id"], 2);
}

#[tokio::test]
async fn tools_list_names_every_coord_tool() {
    let (_tmp, responses) =
        roundtrip(&[json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"})]).await;
    let tools = responses[0]["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 21);
    assert!(tools
        .iter()
        .all(|t| t["name"].as_str().unwrap().starts_with("coord_")));
    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    for expected in [
        "coord_list_sessions",
        "coord_send_message",
        "coord_detect_conflicts",
        "coord_spawn_worker",
        "coord_run_pipeline",
        "coord_send_directive",
        "coord_create_task",
        "coord_create_team",
    ] {
        assert!(names.contains(&expected), "missing {expected}");
    }
}

#[tokio::test]
async fn unknown_method_is_a_jsonrpc_error() {
    let (_tmp, responses) =
        roundtrip(&[json!({"jsonrpc": "2.0", "id": 1, "method": "resources/list"})]).await;
    assert_eq!(
        responses[0]["error"]["code"],
        crate::protocol::METHOD_NOT_FOUND
    );
}

#[tokio::test]
async fn malformed_json_is_answered_and_the_loop_continues() {
    let tmp = tempfile::tempdir().unwrap();
    let root = StateRoot::open(tmp.path()).unwrap();
    let config = Config::load(&root).unwrap();
    let server = Server::new(Ctx::new(root, config));

    let input = "this is not json\n{\"jsonrpc\":\"2.0\",\"id\":5,\"method\":\"ping\"}\n";
    let mut output = std::io::Cursor::new(Vec::new());
    server.run(input.as_bytes(), &mut output).await.unwrap();

    let lines: Vec<Value> = String::from_utf8(output.into_inner())
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["error"]["code"], crate::protocol::PARSE_ERROR);
    assert_eq!(lines[1]["id"], 5);
}

#[tokio::test]
async fn tool_call_failure_is_in_band_not_protocol_level() {
    let (_tmp, responses) = roundtrip(&[json!({
        "jsonrpc": "2.0", "id": 1, "method": "tools/call",
        "params": {"name": "coord_get_session", "arguments": {"session_id": "../../bad"}}
    })])
    .await;

    let result = &responses[0]["result"];
    assert_eq!(result["isError"], true);
    let text = result["content"][0]["text"].as_str().unwrap();
    let payload: Value = serde_json::from_str(text).unwrap();
    assert_eq!(payload["error"], "invalid_argument");
    assert_eq!(payload["message"], "Invalid session_id");
}

#[tokio::test]
async fn list_sessions_on_empty_root() {
    let (_tmp, responses) = roundtrip(&[json!({
        "jsonrpc": "2.0", "id": 1, "method": "tools/call",
        "params": {"name": "coord_list_sessions", "arguments": {}}
    })])
    .await;
    let text = responses[0]["result"]["content"][0]["text"].as_str().unwrap();
    let payload: Value = serde_json::from_str(text).unwrap();
    assert_eq!(payload["sessions"], json!([]));
}
