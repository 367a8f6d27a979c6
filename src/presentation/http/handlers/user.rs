//! User Handlers
//!
//! `/users` endpoints, forwarded to the users service.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
};
use serde_json::json;

use super::{envelope_response, to_payload, with_id};
use crate::application::dto::{CreateUserRequest, ListUsersParams, UpdateUserRequest};
use crate::presentation::http::extractors::ValidatedJson;
use crate::presentation::rpc::handlers::UserCommand;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Create a user
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CreateUserRequest>,
) -> Result<Response, AppError> {
    let envelope = state
        .users
        .send(UserCommand::Create.as_str(), to_payload(&body)?)
        .await?;
    Ok(envelope_response(envelope, StatusCode::CREATED))
}

/// List users with optional search and pagination
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListUsersParams>,
) -> Result<Response, AppError> {
    let envelope = state
        .users
        .send(UserCommand::List.as_str(), to_payload(&params)?)
        .await?;
    Ok(envelope_response(envelope, StatusCode::OK))
}

/// Get a user by ID
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let envelope = state
        .users
        .send(UserCommand::Get.as_str(), json!({ "id": id }))
        .await?;
    Ok(envelope_response(envelope, StatusCode::OK))
}

/// Partially update a user
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(body): ValidatedJson<UpdateUserRequest>,
) -> Result<Response, AppError> {
    let payload = with_id(to_payload(&body)?, id);
    let envelope = state
        .users
        .send(UserCommand::Update.as_str(), payload)
        .await?;
    Ok(envelope_response(envelope, StatusCode::OK))
}

/// Soft-delete a user
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let envelope = state
        .users
        .send(UserCommand::Delete.as_str(), json!({ "id": id }))
        .await?;
    Ok(envelope_response(envelope, StatusCode::OK))
}
