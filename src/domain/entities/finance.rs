//! Finance entity and repository trait.
//!
//! Maps to the `finances` table in the finance service database.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::value_objects::Lifecycle;
use crate::shared::error::AppError;

/// Maximum description length, in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// Decimal places kept by the `valor NUMERIC(15, 2)` column.
pub const AMOUNT_SCALE: u32 = 2;

pub const OWNER_ID_REQUIRED: &str = "Owner ID is required and must be greater than zero";
pub const AMOUNT_REQUIRED: &str = "Amount is required";
pub const DESCRIPTION_REQUIRED: &str = "Description is required";
pub const AMOUNT_OUT_OF_RANGE: &str = "Amount must be less than 10000000000000 in absolute value";

/// Largest absolute amount `NUMERIC(15, 2)` can hold.
pub static MAX_ABS_AMOUNT: Lazy<Decimal> = Lazy::new(|| Decimal::new(999_999_999_999_999, AMOUNT_SCALE));

/// A single ledger entry owned by a user.
///
/// Maps to the `finances` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - user_id: BIGINT NOT NULL
/// - valor: NUMERIC(15, 2) NOT NULL -- negative values are expenses
/// - descricao: VARCHAR(500) NOT NULL
/// - is_deleted: BOOLEAN NOT NULL DEFAULT FALSE
/// - created / updated: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - deleted: TIMESTAMPTZ NULL
///
/// Fields are private so an instance can only exist in a valid state.
#[derive(Debug, Clone, PartialEq)]
pub struct Finance {
    id: Option<i64>,
    owner_id: i64,
    amount: Decimal,
    description: String,
    lifecycle: Lifecycle,
}

impl Finance {
    /// Build a new, not yet persisted, finance record.
    pub fn create(
        owner_id: i64,
        amount: Decimal,
        description: impl Into<String>,
    ) -> Result<Self, AppError> {
        let description = description.into();
        let amount = normalize_amount(amount);
        Self::validate(owner_id, amount, &description)?;

        Ok(Self {
            id: None,
            owner_id,
            amount,
            description,
            lifecycle: Lifecycle::new(),
        })
    }

    /// Rebuild a stored record. Runs the same validation as [`Finance::create`].
    pub fn restore(
        id: i64,
        owner_id: i64,
        amount: Decimal,
        description: String,
        lifecycle: Lifecycle,
    ) -> Result<Self, AppError> {
        let amount = normalize_amount(amount);
        Self::validate(owner_id, amount, &description)?;

        Ok(Self {
            id: Some(id),
            owner_id,
            amount,
            description,
            lifecycle,
        })
    }

    /// Replace amount and description.
    ///
    /// The new values are validated before anything is assigned, so a
    /// rejected update leaves the record untouched.
    pub fn update_info(
        &mut self,
        amount: Decimal,
        description: impl Into<String>,
    ) -> Result<(), AppError> {
        let description = description.into();
        let amount = normalize_amount(amount);
        Self::validate(self.owner_id, amount, &description)?;

        self.amount = amount;
        self.description = description;
        self.lifecycle.touch();
        Ok(())
    }

    /// Mark the record as deleted without removing it.
    pub fn soft_delete(&mut self) {
        self.lifecycle.soft_delete();
    }

    fn validate(owner_id: i64, amount: Decimal, description: &str) -> Result<(), AppError> {
        if owner_id <= 0 {
            return Err(AppError::Validation(OWNER_ID_REQUIRED.into()));
        }

        if amount.abs() > *MAX_ABS_AMOUNT {
            return Err(AppError::Validation(AMOUNT_OUT_OF_RANGE.into()));
        }

        if description.trim().is_empty() {
            return Err(AppError::Validation(DESCRIPTION_REQUIRED.into()));
        }

        if description.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err(AppError::Validation(format!(
                "Description must be at most {} characters",
                MAX_DESCRIPTION_LENGTH
            )));
        }

        Ok(())
    }

    /// Store-assigned identifier, `None` until persisted.
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn owner_id(&self) -> i64 {
        self.owner_id
    }

    /// Signed amount; negative values are expenses.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn is_deleted(&self) -> bool {
        self.lifecycle.is_deleted
    }
}

fn normalize_amount(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Repository trait for Finance data access operations.
///
/// Soft-deleted rows are skipped by the listing queries unless
/// `include_deleted` is set; single-row lookups always return them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FinanceRepository: Send + Sync {
    /// Insert a record and return it as stored.
    async fn create(&self, finance: &Finance) -> Result<Finance, AppError>;

    /// Find a record by id, deleted or not.
    async fn find_by_id(&self, id: i64) -> Result<Option<Finance>, AppError>;

    /// List every record.
    async fn find_all(&self, include_deleted: bool) -> Result<Vec<Finance>, AppError>;

    /// List the records of one owner.
    async fn find_by_owner(
        &self,
        owner_id: i64,
        include_deleted: bool,
    ) -> Result<Vec<Finance>, AppError>;

    /// Overwrite the mutable fields of row `id` and return it as stored.
    async fn update(&self, id: i64, finance: &Finance) -> Result<Finance, AppError>;

    /// Flag row `id` as deleted. Does not check that it exists.
    async fn soft_delete(&self, id: i64) -> Result<(), AppError>;

    /// Physically remove row `id`.
    async fn hard_delete(&self, id: i64) -> Result<(), AppError>;
}
