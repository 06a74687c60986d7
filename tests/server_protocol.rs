// tests/server_protocol.rs

mod common;
use crate::common::{init_tracing, with_timeout};

use std::sync::Arc;

use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use maestro_mcp::server::protocol::{
    INVALID_PARAMS, METHOD_NOT_FOUND, PARSE_ERROR, PROTOCOL_VERSION, handle_request, parse_message,
};
use maestro_mcp::server::serve;
use maestro_mcp_test_utils::fake_runner::FakeRunner;
use maestro_mcp_test_utils::router_with;

async fn roundtrip(line: &str) -> Value {
    let router = router_with(Arc::new(FakeRunner::succeeding()));
    let request = parse_message(line).expect("valid request");
    let response = handle_request(&router, request)
        .await
        .expect("request with id gets a response");
    serde_json::to_value(response).unwrap()
}

#[tokio::test]
async fn initialize_reports_protocol_and_tools_capability() {
    init_tracing();

    let v = roundtrip(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#).await;

    assert_eq!(v["id"], 1);
    assert_eq!(v["result"]["protocolVersion"], PROTOCOL_VERSION);
    assert!(v["result"]["capabilities"]["tools"].is_object());
    assert_eq!(v["result"]["serverInfo"]["name"], "maestro-mcp");
}

#[tokio::test]
async fn tools_list_includes_schemas() {
    init_tracing();

    let v = roundtrip(r#"{"jsonrpc":"2.0","id":"a","method":"tools/list"}"#).await;

    let tools = v["result"]["tools"].as_array().unwrap();
    let run_steps = tools.iter().find(|t| t["name"] == "run_steps").unwrap();
    assert_eq!(run_steps["inputSchema"]["type"], "object");
}

#[tokio::test]
async fn unknown_method_and_bad_params_are_rpc_errors() {
    init_tracing();

    let v = roundtrip(r#"{"jsonrpc":"2.0","id":2,"method":"resources/list"}"#).await;
    assert_eq!(v["error"]["code"], METHOD_NOT_FOUND);

    let v = roundtrip(r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{}}"#).await;
    assert_eq!(v["error"]["code"], INVALID_PARAMS);
}

#[tokio::test]
async fn tool_failures_stay_inside_the_result() {
    init_tracing();

    let v = roundtrip(
        r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"swipe","arguments":{"appId":"a"}}}"#,
    )
    .await;

    assert!(v.get("error").is_none());
    assert_eq!(v["result"]["isError"], true);
    assert_eq!(v["result"]["content"][0]["type"], "text");
}

#[test]
fn malformed_json_is_a_parse_error() {
    let response = parse_message("{not json").unwrap_err();
    let v = serde_json::to_value(response).unwrap();
    assert_eq!(v["error"]["code"], PARSE_ERROR);
    assert_eq!(v["id"], Value::Null);
}

#[tokio::test]
async fn serve_answers_requests_and_skips_notifications() {
    init_tracing();

    let router = Arc::new(router_with(Arc::new(FakeRunner::succeeding())));
    let (mut client, server_io) = tokio::io::duplex(64 * 1024);
    let (server_read, server_write) = tokio::io::split(server_io);

    let server = tokio::spawn(serve(router, server_read, server_write));

    let requests = [
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        json!({"jsonrpc": "2.0", "id": 2, "method": "ping"}),
    ];
    for request in &requests {
        client.write_all(request.to_string().as_bytes()).await.unwrap();
        client.write_all(b"\n").await.unwrap();
    }

    client.shutdown().await.unwrap();

    let mut lines = BufReader::new(client).lines();
    let mut ids = Vec::new();
    while let Some(line) = with_timeout(lines.next_line()).await.unwrap() {
        let v: Value = serde_json::from_str(&line).unwrap();
        ids.push(v["id"].clone());
    }
    ids.sort_by_key(|id| id.as_i64());

    assert_eq!(ids, vec![json!(1), json!(2)]);
    with_timeout(server).await.unwrap().unwrap();
}

#[tokio::test]
async fn explicit_null_id_still_gets_a_response() {
    init_tracing();

    let v = roundtrip(r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#).await;

    assert_eq!(v["id"], Value::Null);
    assert!(v["result"].is_object());
}

#[tokio::test]
async fn missing_id_is_a_notification() {
    init_tracing();

    let router = router_with(Arc::new(FakeRunner::succeeding()));
    let request = parse_message(r#"{"jsonrpc":"2.0","method":"ping"}"#).unwrap();

    assert!(request.is_notification());
    assert!(handle_request(&router, request).await.is_none());
}

#[tokio::test]
async fn serve_rejects_invalid_utf8_and_keeps_serving() {
    init_tracing();

    let router = Arc::new(router_with(Arc::new(FakeRunner::succeeding())));
    let (mut client, server_io) = tokio::io::duplex(64 * 1024);
    let (server_read, server_write) = tokio::io::split(server_io);

    let server = tokio::spawn(serve(router, server_read, server_write));

    let mut bad = br#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"caf"#.to_vec();
    bad.push(0xe9);
    bad.extend_from_slice(b"\"}}\n");
    client.write_all(&bad).await.unwrap();
    client
        .write_all(b"{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"ping\"}\n")
        .await
        .unwrap();
    client.shutdown().await.unwrap();

    let mut lines = BufReader::new(client).lines();
    let mut responses = Vec::new();
    while let Some(line) = with_timeout(lines.next_line()).await.unwrap() {
        responses.push(serde_json::from_str::<Value>(&line).unwrap());
    }

    assert_eq!(responses.len(), 2);
    let rejected = responses.iter().find(|v| v["id"].is_null()).unwrap();
    assert_eq!(rejected["error"]["code"], PARSE_ERROR);
    let ping = responses.iter().find(|v| v["id"] == 2).unwrap();
    assert!(ping["result"].is_object());

    with_timeout(server).await.unwrap().unwrap();
}
