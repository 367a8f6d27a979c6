//! User entity and repository trait.
//!
//! Maps to the `users` table in the users service database.

use std::str::FromStr;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Address, Lifecycle};
use crate::shared::error::AppError;

/// Deliberately loose address check: something@something.tld without spaces.
pub static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

pub const NAME_REQUIRED: &str = "Name is required";
pub const EMAIL_INVALID: &str = "Email is invalid";

/// Width of the `nome` and `email` columns, in characters.
pub const MAX_NAME_LENGTH: usize = 255;
pub const MAX_EMAIL_LENGTH: usize = 255;

/// Account status matching the database enum `('ativo', 'inativo')`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum UserStatus {
    #[default]
    #[serde(rename = "ativo", alias = "active")]
    Active,
    #[serde(rename = "inativo", alias = "inactive")]
    Inactive,
}

impl UserStatus {
    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ativo",
            Self::Inactive => "inativo",
        }
    }
}

impl FromStr for UserStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ativo" | "active" => Ok(Self::Active),
            "inativo" | "inactive" => Ok(Self::Inactive),
            other => Err(AppError::Validation(format!("Unknown user status: {}", other))),
        }
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents a user account.
///
/// Maps to the `users` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - nome: VARCHAR(255) NOT NULL
/// - email: VARCHAR(255) NOT NULL -- unique among rows where NOT is_deleted
/// - rua, numero, bairro, complemento, cidade, estado, cep: address columns
/// - status: VARCHAR(10) NOT NULL DEFAULT 'ativo'
/// - is_deleted, created, updated, deleted: lifecycle columns
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: Option<i64>,
    name: String,
    email: String,
    address: Address,
    status: UserStatus,
    lifecycle: Lifecycle,
}

impl User {
    /// Build a new, not yet persisted, user.
    pub fn create(
        name: impl Into<String>,
        email: impl Into<String>,
        address: Address,
        status: UserStatus,
    ) -> Result<Self, AppError> {
        let name = name.into();
        let email = email.into();
        Self::validate(&name, &email)?;

        Ok(Self {
            id: None,
            name,
            email,
            address,
            status,
            lifecycle: Lifecycle::new(),
        })
    }

    /// Rebuild a stored user. Runs the same validation as [`User::create`].
    pub fn restore(
        id: i64,
        name: String,
        email: String,
        address: Address,
        status: UserStatus,
        lifecycle: Lifecycle,
    ) -> Result<Self, AppError> {
        Self::validate(&name, &email)?;

        Ok(Self {
            id: Some(id),
            name,
            email,
            address,
            status,
            lifecycle,
        })
    }

    /// Replace every mutable field at once.
    ///
    /// Validation runs before assignment; on failure the user is unchanged.
    pub fn update_info(
        &mut self,
        name: impl Into<String>,
        email: impl Into<String>,
        address: Address,
        status: UserStatus,
    ) -> Result<(), AppError> {
        let name = name.into();
        let email = email.into();
        Self::validate(&name, &email)?;

        self.name = name;
        self.email = email;
        self.address = address;
        self.status = status;
        self.lifecycle.touch();
        Ok(())
    }

    /// Mark the user as deleted without removing the row.
    pub fn soft_delete(&mut self) {
        self.lifecycle.soft_delete();
    }

    fn validate(name: &str, email: &str) -> Result<(), AppError> {
        if name.trim().is_empty() {
            return Err(AppError::Validation(NAME_REQUIRED.into()));
        }

        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(AppError::Validation(format!(
                "Name must be at most {} characters",
                MAX_NAME_LENGTH
            )));
        }

        if !EMAIL_PATTERN.is_match(email) {
            return Err(AppError::Validation(EMAIL_INVALID.into()));
        }

        if email.chars().count() > MAX_EMAIL_LENGTH {
            return Err(AppError::Validation(format!(
                "Email must be at most {} characters",
                MAX_EMAIL_LENGTH
            )));
        }

        Ok(())
    }

    /// Store-assigned identifier, `None` until persisted.
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn status(&self) -> UserStatus {
        self.status
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn is_deleted(&self) -> bool {
        self.lifecycle.is_deleted
    }
}

/// Repository trait for User data access operations.
///
/// Implementations of this trait handle the actual database interactions.
/// The trait is defined in the domain layer to maintain dependency inversion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user and return it as stored.
    async fn create(&self, user: &User) -> Result<User, AppError>;

    /// Find a user by id, deleted or not.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Find a user by email address, preferring a non-deleted row.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// List users, skipping soft-deleted ones unless asked.
    async fn find_all(&self, include_deleted: bool) -> Result<Vec<User>, AppError>;

    /// Overwrite the mutable fields of row `id` and return it as stored.
    async fn update(&self, id: i64, user: &User) -> Result<User, AppError>;

    /// Flag row `id` as deleted. Does not check that it exists.
    async fn soft_delete(&self, id: i64) -> Result<(), AppError>;

    /// Physically remove row `id`.
    async fn hard_delete(&self, id: i64) -> Result<(), AppError>;
}
