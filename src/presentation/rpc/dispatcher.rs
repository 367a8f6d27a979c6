//! Command dispatch seam between the channel server and a service's handlers.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::messages::Envelope;
use crate::shared::error::{AppError, INVALID_PAYLOAD};

/// Routes a tagged command to the matching use-case.
///
/// `dispatch` never fails: every error is folded into the returned
/// [`Envelope`].
#[async_trait]
pub trait CommandDispatcher: Send + Sync + 'static {
    /// Service name used in logs.
    fn service(&self) -> &'static str;

    /// Whether `command` is one of this service's tags. Exact,
    /// case-sensitive match.
    fn handles(&self, command: &str) -> bool;

    async fn dispatch(&self, command: &str, data: Value) -> Envelope;
}

/// Decode a command payload. A missing payload reads as `{}`.
pub fn decode_payload<T: DeserializeOwned>(data: Value) -> Result<T, AppError> {
    let data = if data.is_null() {
        Value::Object(Default::default())
    } else {
        data
    };
    serde_json::from_value(data).map_err(|e| AppError::Validation(format!("{} {}", INVALID_PAYLOAD, e)))
}
