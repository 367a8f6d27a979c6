//! Finance Handlers
//!
//! `/finance` endpoints, forwarded to the finance service.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
};
use serde_json::json;

use super::{envelope_response, to_payload, with_id};
use crate::application::dto::{CreateFinanceRequest, IncludeDeletedParams, UpdateFinanceRequest};
use crate::presentation::http::extractors::ValidatedJson;
use crate::presentation::rpc::handlers::FinanceCommand;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Create a finance record
pub async fn create_finance(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CreateFinanceRequest>,
) -> Result<Response, AppError> {
    let envelope = state
        .finance
        .send(FinanceCommand::Create.as_str(), to_payload(&body)?)
        .await?;
    Ok(envelope_response(envelope, StatusCode::CREATED))
}

/// List every finance record
pub async fn list_finances(
    State(state): State<AppState>,
    Query(params): Query<IncludeDeletedParams>,
) -> Result<Response, AppError> {
    let envelope = state
        .finance
        .send(FinanceCommand::List.as_str(), to_payload(&params)?)
        .await?;
    Ok(envelope_response(envelope, StatusCode::OK))
}

/// List the records of one owner
pub async fn list_finances_by_owner(
    State(state): State<AppState>,
    Path(owner_id): Path<i64>,
    Query(params): Query<IncludeDeletedParams>,
) -> Result<Response, AppError> {
    let payload = json!({
        "ownerId": owner_id,
        "includeDeleted": params.include_deleted,
    });
    let envelope = state
        .finance
        .send(FinanceCommand::ListByOwner.as_str(), payload)
        .await?;
    Ok(envelope_response(envelope, StatusCode::OK))
}

/// Get a finance record by ID
pub async fn get_finance(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let envelope = state
        .finance
        .send(FinanceCommand::Get.as_str(), json!({ "id": id }))
        .await?;
    Ok(envelope_response(envelope, StatusCode::OK))
}

/// Partially update a finance record
pub async fn update_finance(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(body): ValidatedJson<UpdateFinanceRequest>,
) -> Result<Response, AppError> {
    let payload = with_id(to_payload(&body)?, id);
    let envelope = state
        .finance
        .send(FinanceCommand::Update.as_str(), payload)
        .await?;
    Ok(envelope_response(envelope, StatusCode::OK))
}

/// Soft-delete a finance record
pub async fn delete_finance(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let envelope = state
        .finance
        .send(FinanceCommand::Delete.as_str(), json!({ "id": id }))
        .await?;
    Ok(envelope_response(envelope, StatusCode::OK))
}
