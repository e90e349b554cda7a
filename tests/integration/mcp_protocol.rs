/// JSON-RPC level tests of the MCP server
use std::sync::Arc;

use chrono::NaiveDate;
use mood_journal_mcp::*;
use serde_json::{json, Value};

fn server_for(session: StaticSession) -> McpServer {
    let storage = Arc::new(SqliteStorage::open_in_memory().expect("Failed to open storage"));
    let clock = Arc::new(FixedClock::at(
        NaiveDate::from_ymd_opt(2024, 11, 5).unwrap().and_hms_opt(9, 15, 0).unwrap(),
    ));

    McpServer::new(MoodJournalServer::with_stores(
        storage.clone(),
        storage,
        Arc::new(session),
        clock,
    ))
}

fn server() -> McpServer {
    server_for(StaticSession::new(UserId::new("mcp-user")))
}

async fn call(server: &mut McpServer, id: u64, tool: &str, arguments: Value) -> Value {
    let request = json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {"name": tool, "arguments": arguments}
    });
    let response = server
        .handle_line(&request.to_string())
        .await
        .expect("tools/call must produce a response");
    let value = serde_json::to_value(response).unwrap();
    assert_eq!(value["id"], json!(id));
    value["result"].clone()
}

#[tokio::test]
async fn test_initialize_handshake() {
    let mut server = server();

    let response = server
        .handle_line(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#)
        .await
        .unwrap();
    let value = serde_json::to_value(response).unwrap();
    assert_eq!(value["result"]["protocolVersion"], json!(MCP_VERSION));
    assert_eq!(value["result"]["serverInfo"]["name"], json!("Mood Journal MCP"));

    // notifications get no reply
    let ack = server
        .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
        .await;
    assert!(ack.is_none());
    assert!(server.is_initialized());
}

#[tokio::test]
async fn test_tools_list_has_schemas() {
    let mut server = server();
    let response = server
        .handle_line(r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#)
        .await
        .unwrap();
    let value = serde_json::to_value(response).unwrap();
    let tools = value["result"]["tools"].as_array().unwrap();

    let names: Vec<_> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    for expected in [
        "streak_get",
        "streak_update",
        "streak_initialize",
        "mood_set",
        "mood_today",
        "mood_recent",
        "mood_monthly_stats",
        "mood_levels",
    ] {
        assert!(names.contains(&expected), "missing tool {}", expected);
    }

    let mood_set = tools.iter().find(|t| t["name"] == "mood_set").unwrap();
    assert!(mood_set["inputSchema"]["properties"]["mood_level"].is_object());
}

#[tokio::test]
async fn test_unknown_method_and_bad_json() {
    let mut server = server();

    let response = server
        .handle_line(r#"{"jsonrpc":"2.0","id":3,"method":"resources/list"}"#)
        .await
        .unwrap();
    assert_eq!(serde_json::to_value(response).unwrap()["error"]["code"], json!(-32601));

    let response = server.handle_line("{not json").await.unwrap();
    assert_eq!(serde_json::to_value(response).unwrap()["error"]["code"], json!(-32700));

    assert!(server.handle_line("   ").await.is_none());
}

#[tokio::test]
async fn test_streak_tools() {
    let mut server = server();

    let result = call(&mut server, 10, "streak_get", json!({})).await;
    assert_eq!(result["structuredContent"]["streak"], json!(0));

    let result = call(&mut server, 11, "streak_update", json!({})).await;
    assert_eq!(result["isError"], json!(false));
    assert_eq!(result["structuredContent"]["streak"], json!(1));

    let result = call(&mut server, 12, "streak_update", json!({})).await;
    assert_eq!(result["structuredContent"]["streak"], json!(1));

    let result = call(&mut server, 13, "streak_initialize", json!({})).await;
    assert_eq!(result["structuredContent"]["streak"], json!(1));
}

#[tokio::test]
async fn test_mood_tools_round_trip() {
    let mut server = server();

    let result = call(&mut server, 20, "mood_today", json!({})).await;
    assert_eq!(result["structuredContent"]["entries"], json!([]));

    let result = call(&mut server, 21, "mood_set", json!({"mood_level": 5})).await;
    assert_eq!(result["isError"], json!(false));

    let result = call(&mut server, 22, "mood_set", json!({"mood_level": 7, "notes": "long day"})).await;
    let entry = &result["structuredContent"]["entries"][0];
    assert_eq!(entry["mood_level"], json!(7));
    assert_eq!(entry["mood_label"], json!("Tired"));
    assert_eq!(entry["entry_date"], json!("2024-11-05"));

    let result = call(&mut server, 23, "mood_recent", json!({"days": 3})).await;
    assert_eq!(result["structuredContent"]["entries"].as_array().unwrap().len(), 1);

    let result = call(&mut server, 24, "mood_monthly_stats", json!({})).await;
    let stats = &result["structuredContent"];
    assert_eq!(stats["year"], json!(2024));
    assert_eq!(stats["month"], json!(11));
    assert_eq!(stats["stats"]["total_entries"], json!(1));
    assert_eq!(stats["stats"]["current_streak"], json!(1));
}

#[tokio::test]
async fn test_mood_errors_are_visible() {
    let mut server = server();

    let result = call(&mut server, 30, "mood_set", json!({"mood_level": 9})).await;
    assert_eq!(result["isError"], json!(true));
    assert!(result["content"][0]["text"].as_str().unwrap().contains("Invalid mood level"));

    let result = call(&mut server, 31, "mood_set", json!({"notes": "missing level"})).await;
    assert_eq!(result["isError"], json!(true));

    let result = call(&mut server, 32, "mood_monthly_stats", json!({"year": 2024, "month": 0})).await;
    assert_eq!(result["isError"], json!(true));

    let result = call(&mut server, 33, "no_such_tool", json!({})).await;
    assert_eq!(result["isError"], json!(true));
}

#[tokio::test]
async fn test_tools_require_a_session() {
    let mut server = server_for(StaticSession::anonymous());

    let result = call(&mut server, 40, "streak_update", json!({})).await;
    assert_eq!(result["isError"], json!(true));

    // the catalogue needs no user
    let result = call(&mut server, 41, "mood_levels", json!({})).await;
    assert_eq!(result["isError"], json!(false));
    assert_eq!(result["structuredContent"].as_array().unwrap().len(), 8);
}

#[tokio::test]
async fn test_serve_over_byte_streams() {
    let mut server = server();
    let input = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
        "\n",
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"mood_set","arguments":{"mood_level":2}}}"#,
        "\n"
    );
    let mut output = Vec::new();

    server
        .serve(tokio::io::BufReader::new(input.as_bytes()), &mut output)
        .await
        .unwrap();

    let lines: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1]["result"]["structuredContent"]["entries"][0]["mood_label"], json!("Calm"));
}

#[tokio::test]
async fn test_read_tools_do_not_create_a_profile() {
    let storage = Arc::new(SqliteStorage::open_in_memory().expect("Failed to open storage"));
    let clock = Arc::new(FixedClock::at(
        NaiveDate::from_ymd_opt(2024, 11, 5).unwrap().and_hms_opt(9, 15, 0).unwrap(),
    ));
    let user = UserId::new("browser");
    let mut server = McpServer::new(MoodJournalServer::with_stores(
        storage.clone(),
        storage.clone(),
        Arc::new(StaticSession::new(user.clone())),
        clock,
    ));

    let result = call(&mut server, 50, "mood_today", json!({})).await;
    assert_eq!(result["isError"], json!(false));
    assert_eq!(result["structuredContent"]["entries"], json!([]));

    let result = call(&mut server, 51, "mood_recent", json!({"days": 30})).await;
    assert_eq!(result["structuredContent"]["entries"], json!([]));

    let result = call(&mut server, 52, "mood_monthly_stats", json!({})).await;
    assert_eq!(result["structuredContent"]["stats"]["total_entries"], json!(0));
    assert_eq!(result["structuredContent"]["stats"]["distribution"].as_array().unwrap().len(), 8);

    let result = call(&mut server, 53, "mood_monthly_stats", json!({"month": 13})).await;
    assert_eq!(result["isError"], json!(true));

    assert_eq!(storage.find_profile(&user).await.unwrap(), None);

    // the first write is what creates the profile
    call(&mut server, 54, "mood_set", json!({"mood_level": 1})).await;
    assert!(storage.find_profile(&user).await.unwrap().is_some());
}
