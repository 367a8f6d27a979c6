//! Application Error Types
//!
//! Centralized error handling with Axum integration.
//!
//! Backend services flatten every [`AppError`] into a command envelope that
//! only keeps the message. The gateway gets the kind back with
//! [`ErrorKind::classify`] to choose an HTTP status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Prefix of errors raised while decoding a command payload.
pub const INVALID_PAYLOAD: &str = "Invalid payload:";

/// Prefix of errors raised for a command tag no service recognizes.
pub const UNKNOWN_COMMAND: &str = "Unknown command:";

/// Coarse error category shared by both sides of the command channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Infrastructure,
}

impl AppError {
    /// The category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Conflict(_) => ErrorKind::Conflict,
            AppError::Database(_) | AppError::Transport(_) | AppError::Internal(_) => {
                ErrorKind::Infrastructure
            }
        }
    }
}

impl ErrorKind {
    /// Recover the category of a flattened envelope error from its message.
    ///
    /// The envelope carries no machine-readable code, so this relies on the
    /// wording produced by [`AppError`]'s `Display` implementation.
    pub fn classify(message: &str) -> Self {
        const INFRASTRUCTURE_PREFIXES: [&str; 3] =
            ["Database error", "Transport error", "Internal error"];

        if INFRASTRUCTURE_PREFIXES
            .iter()
            .any(|prefix| message.starts_with(prefix))
        {
            return Self::Infrastructure;
        }

        // These messages echo caller input, so their wording cannot be trusted.
        if message.starts_with(INVALID_PAYLOAD) || message.starts_with(UNKNOWN_COMMAND) {
            return Self::Validation;
        }

        let lowered = message.to_lowercase();
        if lowered.contains("not found") {
            Self::NotFound
        } else if lowered.contains("already registered") || lowered.contains("already exists") {
            Self::Conflict
        } else {
            Self::Validation
        }
    }

    /// HTTP status the gateway answers with for this category.
    pub fn status_code(self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Validation | Self::Conflict => StatusCode::BAD_REQUEST,
            Self::Infrastructure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body, shaped like a failed command envelope
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.kind().status_code();

        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                "Internal server error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            AppError::Transport(msg) => {
                tracing::error!("Transport error: {}", msg);
                self.to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorResponse {
            success: false,
            error: message,
        };

        (status, Json(body)).into_response()
    }
}
