//! Gateway behavior tests
//!
//! Status mapping, input validation and forwarding, with a recording stub in
//! place of the backend services where the wire is not the point.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use test_case::test_case;

use accounts_ledger::presentation::http::create_router;
use accounts_ledger::presentation::rpc::{CommandChannel, Envelope};
use accounts_ledger::shared::error::AppError;
use accounts_ledger::startup::AppState;

use crate::common::{client, unique_email, user_body, TestApp};

/// Answers every command with a fixed envelope and records what was sent.
struct StubChannel {
    reply: Envelope,
    sent: Mutex<Vec<(String, Value)>>,
}

impl StubChannel {
    fn new(reply: Envelope) -> Arc<Self> {
        Arc::new(Self {
            reply,
            sent: Mutex::new(Vec::new()),
        })
    }

    fn last(&self) -> (String, Value) {
        self.sent.lock().last().cloned().expect("a command was sent")
    }
}

#[async_trait]
impl CommandChannel for StubChannel {
    async fn send(&self, command: &str, data: Value) -> Result<Envelope, AppError> {
        self.sent.lock().push((command.to_string(), data));
        Ok(self.reply.clone())
    }
}

fn stub_server(users: Arc<StubChannel>, finance: Arc<StubChannel>) -> TestServer {
    TestServer::new(create_router(AppState { users, finance })).expect("test server")
}

fn failure(message: &str) -> Envelope {
    Envelope {
        success: false,
        data: None,
        error: Some(message.into()),
        pagination: None,
    }
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::spawn().await;

    let health = app.server.get("/health").await;
    health.assert_status_ok();
    assert_eq!(health.json::<Value>()["status"], "healthy");

    let live = app.server.get("/health/live").await;
    live.assert_status_ok();
    assert_eq!(live.json::<Value>(), json!({"status": "alive"}));
}

#[tokio::test]
async fn test_metrics_count_forwarded_commands() {
    let app = TestApp::spawn().await;
    app.server.get("/finance").await.assert_status_ok();

    let metrics = app.server.get("/metrics").await;
    metrics.assert_status_ok();
    let text = metrics.text();
    assert!(text.contains("accounts_ledger_rpc_requests_total"));
    assert!(text.contains("list_finances"));
}

#[test_case("Finance record with ID 1 not found", StatusCode::NOT_FOUND ; "not found")]
#[test_case("Email already registered", StatusCode::BAD_REQUEST ; "conflict")]
#[test_case("Owner ID is required and must be greater than zero", StatusCode::BAD_REQUEST ; "validation")]
#[test_case("Database error: pool timed out", StatusCode::INTERNAL_SERVER_ERROR ; "infrastructure")]
#[tokio::test]
async fn test_failure_envelope_status(error: &str, expected: StatusCode) {
    let finance = StubChannel::new(failure(error));
    let server = stub_server(StubChannel::new(Envelope::success(json!({}))), finance);

    let response = server.get("/finance/1").await;

    response.assert_status(expected);
    assert_eq!(response.json::<Value>(), json!({"success": false, "error": error}));
}

#[tokio::test]
async fn test_unknown_fields_are_not_forwarded() {
    let users = StubChannel::new(Envelope::success(json!({"id": 1})));
    let server = stub_server(users.clone(), StubChannel::new(Envelope::success(json!({}))));

    let mut body = user_body("ana@example.com");
    body["isAdmin"] = json!(true);
    server.post("/users").json(&body).await.assert_status(StatusCode::CREATED);

    let (command, payload) = users.last();
    assert_eq!(command, "create_user");
    assert!(payload.get("isAdmin").is_none());
    assert_eq!(payload["email"], "ana@example.com");
}

#[tokio::test]
async fn test_path_id_overrides_body_id() {
    let finance = StubChannel::new(Envelope::success(json!({"id": 7})));
    let server = stub_server(StubChannel::new(Envelope::success(json!({}))), finance.clone());

    server
        .put("/finance/7")
        .json(&json!({"id": 99, "description": "Feira"}))
        .await
        .assert_status_ok();

    let (command, payload) = finance.last();
    assert_eq!(command, "update_finance");
    assert_eq!(payload, json!({"id": 7, "description": "Feira"}));
}

#[tokio::test]
async fn test_list_by_owner_payload() {
    let finance = StubChannel::new(Envelope::success(json!([])));
    let server = stub_server(StubChannel::new(Envelope::success(json!({}))), finance.clone());

    server
        .get("/finance/user/4")
        .add_query_param("includeDeleted", true)
        .await
        .assert_status_ok();

    assert_eq!(
        finance.last(),
        (
            "list_finances_by_owner".to_string(),
            json!({"ownerId": 4, "includeDeleted": true})
        )
    );
}

#[tokio::test]
async fn test_invalid_body_never_reaches_the_service() {
    let users = StubChannel::new(Envelope::success(json!({})));
    let server = stub_server(users.clone(), StubChannel::new(Envelope::success(json!({}))));

    let mut body = user_body("not-an-email");
    body["name"] = json!("");
    let response = server.post("/users").json(&body).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["success"], false);
    assert!(users.sent.lock().is_empty());
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = TestApp::spawn().await;

    let response = app
        .server
        .post("/finance")
        .text("{ not json")
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["success"], false);
}

#[tokio::test]
async fn test_unreachable_backend_is_internal_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let state = AppState {
        users: Arc::new(client("users", addr)),
        finance: Arc::new(client("finance", addr)),
    };
    let server = TestServer::new(create_router(state)).expect("test server");

    let response = server.post("/users").json(&user_body(&unique_email())).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().expect("error").starts_with("Transport error"));
}

#[tokio::test]
async fn test_cors_and_trace_layers_wrap_the_router() {
    let app = TestApp::spawn().await;

    let response = app
        .server
        .get("/health/live")
        .add_header(
            axum::http::header::ORIGIN,
            axum::http::HeaderValue::from_static("http://frontend.example"),
        )
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("access-control-allow-origin"), "*");
}
