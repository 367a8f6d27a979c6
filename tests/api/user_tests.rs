//! User endpoint tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{unique_email, user_body, TestApp};

#[tokio::test]
async fn test_create_user_returns_created_record() {
    let app = TestApp::spawn().await;
    let email = unique_email();

    let response = app.server.post("/users").json(&user_body(&email)).await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["email"], email.as_str());
    assert_eq!(body["data"]["cep"], "01234-567");
    assert_eq!(body["data"]["status"], "ativo");
    assert_eq!(body["data"]["isDeleted"], false);
}

#[tokio::test]
async fn test_portuguese_field_names_are_accepted() {
    let app = TestApp::spawn().await;

    let response = app
        .server
        .post("/users")
        .json(&json!({
            "nome": "Maria Silva",
            "email": "maria@example.com",
            "rua": "Rua A",
            "numero": "10",
            "bairro": "Centro",
            "cidade": "Recife",
            "estado": "PE",
            "cep": "50000000",
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["data"]["name"], "Maria Silva");
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let app = TestApp::spawn().await;
    let email = unique_email();
    app.create_user(&email).await;

    let response = app.server.post("/users").json(&user_body(&email)).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Email already registered");
}

#[tokio::test]
async fn test_email_of_deleted_user_can_be_reused() {
    let app = TestApp::spawn().await;
    let email = unique_email();
    let id = app.create_user(&email).await;

    app.server
        .delete(&format!("/users/{id}"))
        .await
        .assert_status_ok();

    let response = app.server.post("/users").json(&user_body(&email)).await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["data"]["id"], id + 1);
}

#[tokio::test]
async fn test_invalid_cep_is_rejected_by_the_service() {
    let app = TestApp::spawn().await;
    let mut body = user_body(&unique_email());
    body["cep"] = json!("1234-5678");

    let response = app.server.post("/users").json(&body).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "CEP is invalid");
}

#[tokio::test]
async fn test_cep_with_non_ascii_digits_is_rejected() {
    let app = TestApp::spawn().await;
    let mut body = user_body(&unique_email());
    body["cep"] = json!("١٢٣٤٥-٦٧٨");

    let response = app.server.post("/users").json(&body).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "CEP is invalid");
}

#[tokio::test]
async fn test_overlong_name_is_rejected_before_storage() {
    let app = TestApp::spawn().await;
    let mut body = user_body(&unique_email());
    body["name"] = json!("n".repeat(300));

    let response = app.server.post("/users").json(&body).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["error"],
        "Name must be at most 255 characters"
    );
}

#[tokio::test]
async fn test_get_missing_user_is_not_found() {
    let app = TestApp::spawn().await;

    let response = app.server.get("/users/42").await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>(),
        json!({"success": false, "error": "User with ID 42 not found"})
    );
}

#[tokio::test]
async fn test_partial_update_keeps_other_fields() {
    let app = TestApp::spawn().await;
    let email = unique_email();
    let id = app.create_user(&email).await;

    let response = app
        .server
        .put(&format!("/users/{id}"))
        .json(&json!({"city": "Curitiba", "status": "inativo"}))
        .await;

    response.assert_status_ok();
    let data = response.json::<Value>()["data"].clone();
    assert_eq!(data["city"], "Curitiba");
    assert_eq!(data["status"], "inativo");
    assert_eq!(data["email"], email.as_str());
    assert_eq!(data["cep"], "01234-567");
}

#[tokio::test]
async fn test_update_to_taken_email_is_rejected() {
    let app = TestApp::spawn().await;
    let taken = unique_email();
    app.create_user(&taken).await;
    let id = app.create_user(&unique_email()).await;

    let response = app
        .server
        .put(&format!("/users/{id}"))
        .json(&json!({"email": taken}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Email already registered");
}

#[tokio::test]
async fn test_deleted_user_is_hidden() {
    let app = TestApp::spawn().await;
    let id = app.create_user(&unique_email()).await;

    let response = app.server.delete(&format!("/users/{id}")).await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>()["data"]["message"],
        "User deleted successfully"
    );

    app.server
        .get(&format!("/users/{id}"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    app.server
        .delete(&format!("/users/{id}"))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let listed: Value = app.server.get("/users").await.json();
    assert_eq!(listed["total"], 0);

    let with_deleted: Value = app
        .server
        .get("/users")
        .add_query_param("includeDeleted", true)
        .await
        .json();
    assert_eq!(with_deleted["total"], 1);
    assert_eq!(with_deleted["data"][0]["isDeleted"], true);
}

#[tokio::test]
async fn test_list_users_paginates_and_searches() {
    let app = TestApp::spawn().await;
    for _ in 0..5 {
        app.create_user(&unique_email()).await;
    }
    let mut special = user_body(&unique_email());
    special["name"] = json!("Zacarias Pereira");
    app.server.post("/users").json(&special).await.assert_status(StatusCode::CREATED);

    let page: Value = app
        .server
        .get("/users")
        .add_query_param("page", 2)
        .add_query_param("limit", 4)
        .await
        .json();
    assert_eq!(page["total"], 6);
    assert_eq!(page["page"], 2);
    assert_eq!(page["limit"], 4);
    assert_eq!(page["totalPages"], 2);
    assert_eq!(page["data"].as_array().map(Vec::len), Some(2));

    let found: Value = app
        .server
        .get("/users")
        .add_query_param("search", "zacarias")
        .await
        .json();
    assert_eq!(found["total"], 1);
    assert_eq!(found["data"][0]["name"], "Zacarias Pereira");
}
