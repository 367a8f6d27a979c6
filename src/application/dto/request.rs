//! Request DTOs
//!
//! Bodies and query strings accepted by the gateway. Each one is validated
//! before it is forwarded, and re-serialized so that only known fields reach
//! the backend services.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::finance::amount_number;
use crate::domain::{UserStatus, MAX_DESCRIPTION_LENGTH};

/// `validator` length bounds are `u64`.
const DESCRIPTION_MAX_CHARS: u64 = MAX_DESCRIPTION_LENGTH as u64;

/// Create finance request
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFinanceRequest {
    #[serde(alias = "userId", alias = "user_id")]
    #[validate(range(min = 1, message = "Owner ID must be a positive integer"))]
    pub owner_id: i64,

    #[serde(default, alias = "valor", deserialize_with = "amount_number")]
    #[validate(required(message = "Amount is required"))]
    pub amount: Option<Decimal>,

    #[serde(alias = "descricao")]
    #[validate(length(min = 1, max = DESCRIPTION_MAX_CHARS, message = "Description must be 1-500 characters"))]
    pub description: String,
}

/// Update finance request
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFinanceRequest {
    #[serde(
        default,
        alias = "valor",
        deserialize_with = "amount_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<Decimal>,

    #[serde(default, alias = "descricao", skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = DESCRIPTION_MAX_CHARS, message = "Description must be 1-500 characters"))]
    pub description: Option<String>,
}

/// Create user request
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(alias = "nome")]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(alias = "rua")]
    #[validate(length(min = 1, message = "Street is required"))]
    pub street: String,

    #[serde(alias = "numero")]
    #[validate(length(min = 1, message = "Number is required"))]
    pub number: String,

    #[serde(alias = "bairro")]
    #[validate(length(min = 1, message = "Neighborhood is required"))]
    pub neighborhood: String,

    #[serde(default, alias = "complemento", skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,

    #[serde(alias = "cidade")]
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,

    #[serde(alias = "estado")]
    #[validate(length(min = 1, message = "State is required"))]
    pub state: String,

    #[serde(alias = "postalCode")]
    #[validate(length(min = 8, max = 9, message = "CEP must have 8 digits"))]
    pub cep: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
}

/// Update user request; every field is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default, alias = "nome", skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[serde(default, alias = "rua", skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,

    #[serde(default, alias = "numero", skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,

    #[serde(default, alias = "bairro", skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,

    #[serde(default, alias = "complemento", skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,

    #[serde(default, alias = "cidade", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(default, alias = "estado", skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(default, alias = "postalCode", skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 8, max = 9, message = "CEP must have 8 digits"))]
    pub cep: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
}

/// `GET /users` query parameters
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    #[serde(default)]
    pub include_deleted: bool,
}

/// `includeDeleted` flag accepted by the finance listings.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludeDeletedParams {
    #[serde(default)]
    pub include_deleted: bool,
}
