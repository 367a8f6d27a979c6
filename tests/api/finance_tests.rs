//! Finance endpoint tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::TestApp;

#[tokio::test]
async fn test_create_finance_returns_created_record() {
    let app = TestApp::spawn().await;

    let response = app
        .server
        .post("/finance")
        .json(&json!({"ownerId": 1, "amount": 1500.0, "description": "Salário"}))
        .await;

    response.assert_status(StatusCode::CREATED);
    let data = response.json::<Value>()["data"].clone();
    assert_eq!(data["id"], 1);
    assert_eq!(data["ownerId"], 1);
    assert_eq!(data["amount"], 1500.0);
    assert_eq!(data["description"], "Salário");
    assert_eq!(data["isDeleted"], false);
    assert_eq!(data["deleted"], Value::Null);
}

#[tokio::test]
async fn test_negative_amount_is_accepted() {
    let app = TestApp::spawn().await;
    let id = app.create_finance(3, -250.75, "Aluguel").await;

    let data = app.server.get(&format!("/finance/{id}")).await.json::<Value>()["data"].clone();
    assert_eq!(data["amount"], -250.75);
}

#[tokio::test]
async fn test_missing_owner_is_rejected_at_the_gateway() {
    let app = TestApp::spawn().await;

    let response = app
        .server
        .post("/finance")
        .json(&json!({"amount": 10, "description": "x"}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["success"], false);
}

#[tokio::test]
async fn test_numeric_string_amount_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .server
        .post("/finance")
        .json(&json!({"ownerId": 1, "amount": "12.5", "description": "Feira"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let id = app.create_finance(1, 10.0, "Feira").await;
    app.server
        .put(&format!("/finance/{id}"))
        .json(&json!({"amount": "20"}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_blank_description_is_rejected_by_the_service() {
    let app = TestApp::spawn().await;

    let response = app
        .server
        .post("/finance")
        .json(&json!({"ownerId": 1, "amount": 10, "description": "   "}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Description is required");
}

#[tokio::test]
async fn test_get_missing_finance_is_not_found() {
    let app = TestApp::spawn().await;

    let response = app.server.get("/finance/9").await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>()["error"],
        "Finance record with ID 9 not found"
    );
}

#[tokio::test]
async fn test_partial_update_changes_only_given_fields() {
    let app = TestApp::spawn().await;
    let id = app.create_finance(1, 100.0, "Mercado").await;

    let response = app
        .server
        .put(&format!("/finance/{id}"))
        .json(&json!({"amount": 120.5}))
        .await;

    response.assert_status_ok();
    let data = response.json::<Value>()["data"].clone();
    assert_eq!(data["amount"], 120.5);
    assert_eq!(data["description"], "Mercado");
    assert_eq!(data["ownerId"], 1);
}

#[tokio::test]
async fn test_update_of_deleted_record_is_not_found() {
    let app = TestApp::spawn().await;
    let id = app.create_finance(1, 100.0, "Mercado").await;
    app.server.delete(&format!("/finance/{id}")).await.assert_status_ok();

    app.server
        .put(&format!("/finance/{id}"))
        .json(&json!({"description": "Feira"}))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_soft_delete_and_include_deleted() {
    let app = TestApp::spawn().await;
    let kept = app.create_finance(1, 10.0, "A").await;
    let removed = app.create_finance(1, 20.0, "B").await;

    let response = app.server.delete(&format!("/finance/{removed}")).await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>()["data"]["message"],
        "Finance record deleted successfully"
    );

    let live: Value = app.server.get("/finance").await.json();
    assert_eq!(live["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(live["data"][0]["id"], kept);

    let all: Value = app
        .server
        .get("/finance")
        .add_query_param("includeDeleted", true)
        .await
        .json();
    let ids: Vec<i64> = all["data"]
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|r| r["id"].as_i64())
        .collect();
    assert_eq!(ids, vec![kept, removed]);
    assert_eq!(all["data"][1]["isDeleted"], true);
    assert!(all["data"][1]["deleted"].is_string());
}

#[tokio::test]
async fn test_list_by_owner() {
    let app = TestApp::spawn().await;
    app.create_finance(1, 10.0, "A").await;
    app.create_finance(2, 20.0, "B").await;
    let third = app.create_finance(1, 30.0, "C").await;
    app.server.delete(&format!("/finance/{third}")).await.assert_status_ok();

    let owned: Value = app.server.get("/finance/user/1").await.json();
    assert_eq!(owned["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(owned["data"][0]["description"], "A");

    let owned_all: Value = app
        .server
        .get("/finance/user/1")
        .add_query_param("includeDeleted", true)
        .await
        .json();
    assert_eq!(owned_all["data"].as_array().map(Vec::len), Some(2));

    let nobody: Value = app.server.get("/finance/user/99").await.json();
    assert_eq!(nobody, json!({"success": true, "data": []}));
}
