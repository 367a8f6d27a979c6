//! Command channel tests
//!
//! Raw frames over TCP, and the multiplexing client.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use accounts_ledger::presentation::rpc::{CommandChannel, NO_MATCHING_HANDLER};

use crate::common::{client, spawn_finance_service, spawn_users_service, MAX_FRAME_SIZE};

/// Write raw lines, read one response line per expected reply.
async fn exchange(stream: &mut BufReader<TcpStream>, lines: &[&str], replies: usize) -> Vec<Value> {
    for line in lines {
        stream.get_mut().write_all(line.as_bytes()).await.expect("write");
        stream.get_mut().write_all(b"\n").await.expect("write");
    }

    let mut out = Vec::with_capacity(replies);
    for _ in 0..replies {
        let mut buf = String::new();
        tokio::time::timeout(Duration::from_secs(5), stream.read_line(&mut buf))
            .await
            .expect("reply in time")
            .expect("read");
        out.push(serde_json::from_str(&buf).expect("json reply"));
    }
    out
}

#[tokio::test]
async fn test_reply_frame_shape() {
    let addr = spawn_finance_service().await;
    let mut stream = BufReader::new(TcpStream::connect(addr).await.expect("connect"));

    let replies = exchange(
        &mut stream,
        &[r#"{"id":"abc","pattern":{"cmd":"get_finance"},"data":{"id":5}}"#],
        1,
    )
    .await;

    assert_eq!(
        replies[0],
        json!({
            "id": "abc",
            "response": {"success": false, "error": "Finance record with ID 5 not found"},
            "isDisposed": true
        })
    );
}

#[tokio::test]
async fn test_unknown_command_gets_err_frame() {
    let addr = spawn_users_service().await;
    let mut stream = BufReader::new(TcpStream::connect(addr).await.expect("connect"));

    let replies = exchange(
        &mut stream,
        &[r#"{"id":"r1","pattern":{"cmd":"create_finance"},"data":{}}"#],
        1,
    )
    .await;

    assert_eq!(replies[0]["id"], "r1");
    assert_eq!(replies[0]["err"], NO_MATCHING_HANDLER);
    assert_eq!(replies[0]["isDisposed"], true);
    assert!(replies[0].get("response").is_none());
}

#[tokio::test]
async fn test_connection_survives_bad_frames() {
    let addr = spawn_users_service().await;
    let mut stream = BufReader::new(TcpStream::connect(addr).await.expect("connect"));

    let replies = exchange(
        &mut stream,
        &[
            "not json at all",
            r#"{"id":"x1","pattern":{"cmd":"list_users"},"data":{}}"#,
        ],
        1,
    )
    .await;

    assert_eq!(replies[0]["id"], "x1");
    assert_eq!(replies[0]["response"]["success"], true);
}

#[tokio::test]
async fn test_oversized_frame_closes_connection() {
    let addr = spawn_users_service().await;
    let mut stream = BufReader::new(TcpStream::connect(addr).await.expect("connect"));

    let huge = "x".repeat(MAX_FRAME_SIZE + 10);
    // The server may reset the socket before the whole frame is written.
    let _ = stream.get_mut().write_all(huge.as_bytes()).await;
    let _ = stream.get_mut().write_all(b"\n").await;

    let mut buf = String::new();
    let read = tokio::time::timeout(Duration::from_secs(5), stream.read_line(&mut buf))
        .await
        .expect("closed in time");
    assert!(matches!(read, Ok(0) | Err(_)));
}

#[tokio::test]
async fn test_concurrent_requests_share_one_connection() {
    let addr = spawn_finance_service().await;
    let channel = Arc::new(client("finance", addr));

    let mut tasks = Vec::new();
    for owner in 1..=20_i64 {
        let channel = channel.clone();
        tasks.push(tokio::spawn(async move {
            let envelope = channel
                .send(
                    "create_finance",
                    json!({"ownerId": owner, "amount": owner, "description": format!("entry {owner}")}),
                )
                .await
                .expect("round trip");
            (owner, envelope)
        }));
    }

    for task in tasks {
        let (owner, envelope) = task.await.expect("task");
        assert!(envelope.success);
        let data = envelope.data.expect("data");
        assert_eq!(data["ownerId"], owner);
        assert_eq!(data["description"], format!("entry {owner}"));
    }

    let listed = channel
        .send("list_finances", json!({}))
        .await
        .expect("round trip");
    assert_eq!(listed.data.expect("data").as_array().map(Vec::len), Some(20));
}

#[tokio::test]
async fn test_rejected_command_is_transport_error() {
    let addr = spawn_finance_service().await;
    let channel = client("finance", addr);

    let err = channel
        .send("list_users", json!({}))
        .await
        .expect_err("unknown command");

    assert!(err.to_string().contains(NO_MATCHING_HANDLER));
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    // Bind and drop to get a port nobody listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let err = client("users", addr)
        .send("list_users", json!({}))
        .await
        .expect_err("nothing listening");

    assert!(err.to_string().starts_with("Transport error"));
}

#[tokio::test]
async fn test_finance_lifecycle_over_the_channel() {
    let channel = client("finance", spawn_finance_service().await);

    let created = channel
        .send(
            "create_finance",
            json!({"ownerId": 1, "amount": 1500.00, "description": "Salary"}),
        )
        .await
        .expect("round trip");
    assert!(created.success);
    assert_eq!(created.data.as_ref().expect("data")["amount"], 1500.0);

    let rejected = channel
        .send("create_finance", json!({"ownerId": 1, "amount": 100, "description": ""}))
        .await
        .expect("round trip");
    assert!(!rejected.success);
    assert!(rejected.error.expect("error").contains("Description"));

    channel
        .send("delete_finance", json!({"id": 1}))
        .await
        .expect("round trip");
    let fetched = channel
        .send("get_finance", json!({"id": 1}))
        .await
        .expect("round trip");
    assert_eq!(fetched.error.as_deref(), Some("Finance record with ID 1 not found"));

    let listed = channel
        .send("list_finances", json!({"includeDeleted": true}))
        .await
        .expect("round trip");
    let data = listed.data.expect("data");
    assert_eq!(data[0]["isDeleted"], true);
    assert!(data[0]["deleted"].is_string());
}

#[tokio::test]
async fn test_status_only_update_over_the_channel() {
    let channel = client("users", spawn_users_service().await);
    let mut body = crate::common::user_body("status@example.com");
    body["cep"] = json!("99999-999");

    let created = channel.send("create_user", body).await.expect("round trip");
    let before = created.data.expect("data");

    let updated = channel
        .send("update_user", json!({"id": before["id"], "status": "inativo"}))
        .await
        .expect("round trip");
    let after = updated.data.expect("data");

    assert_eq!(after["status"], "inativo");
    for field in ["name", "email", "street", "number", "neighborhood", "complement", "city", "state", "cep"] {
        assert_eq!(after[field], before[field], "{field} changed");
    }
}

#[tokio::test]
async fn test_listing_larger_than_the_request_limit() {
    let channel = client("finance", spawn_finance_service().await);
    let description = "d".repeat(400);

    for owner in 1..=200_i64 {
        let created = channel
            .send(
                "create_finance",
                json!({"ownerId": owner, "amount": 1, "description": description}),
            )
            .await
            .expect("round trip");
        assert!(created.success);
    }

    let listed = channel
        .send("list_finances", json!({}))
        .await
        .expect("reply larger than the request limit");
    let data = listed.data.expect("data");
    assert!(serde_json::to_vec(&data).expect("encode").len() > MAX_FRAME_SIZE);
    assert_eq!(data.as_array().map(Vec::len), Some(200));

    let fetched = channel
        .send("get_finance", json!({"id": 200}))
        .await
        .expect("same connection still usable");
    assert!(fetched.success);
}

#[tokio::test]
async fn test_string_amount_is_an_invalid_payload() {
    let channel = client("finance", spawn_finance_service().await);

    let envelope = channel
        .send(
            "create_finance",
            json!({"ownerId": 1, "amount": "12.5", "description": "Feira"}),
        )
        .await
        .expect("round trip");

    assert!(!envelope.success);
    assert!(envelope.error.expect("error").starts_with("Invalid payload:"));
}
