//! HTTP Handlers
//!
//! Each handler validates its input, forwards exactly one command to a
//! backend service and maps the returned envelope onto an HTTP status.

pub mod finance;
pub mod health;
pub mod user;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::presentation::rpc::Envelope;
use crate::shared::error::{AppError, ErrorKind};

/// Answer with the envelope as body.
///
/// Success uses `success_status`; failures get the status of the kind
/// recovered from the error message.
pub fn envelope_response(envelope: Envelope, success_status: StatusCode) -> Response {
    let status = if envelope.success {
        success_status
    } else {
        envelope
            .error
            .as_deref()
            .map(ErrorKind::classify)
            .unwrap_or(ErrorKind::Infrastructure)
            .status_code()
    };

    (status, Json(envelope)).into_response()
}

/// Serialize a validated request into a command payload.
pub fn to_payload<T: Serialize>(value: &T) -> Result<Value, AppError> {
    serde_json::to_value(value).map_err(|e| AppError::Internal(format!("payload encoding failed: {}", e)))
}

/// Payload with the path id merged into the body.
pub fn with_id(mut payload: Value, id: i64) -> Value {
    match payload.as_object_mut() {
        Some(object) => {
            object.insert("id".into(), Value::from(id));
            payload
        }
        None => serde_json::json!({ "id": id }),
    }
}
