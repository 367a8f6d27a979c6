//! Custom Extractors
//!
//! Axum extractors for request parsing.

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::shared::error::AppError;
use crate::shared::validation::validation_error;

/// JSON body that has passed its `validator` rules.
///
/// Malformed JSON, a wrong content type and rule violations all reject with
/// [`AppError::Validation`], answered as 400 with an error envelope.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;

        value.validate().map_err(validation_error)?;

        Ok(Self(value))
    }
}
