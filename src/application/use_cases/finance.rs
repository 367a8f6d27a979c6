//! Finance use-cases
//!
//! One operation object per command. Each holds the repository it needs and
//! exposes a single `execute`.

use std::sync::Arc;

use crate::application::dto::{CreateFinanceDto, UpdateFinanceDto};
use crate::domain::{Finance, FinanceRepository, AMOUNT_REQUIRED};
use crate::shared::error::AppError;

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Finance record with ID {} not found", id))
}

/// Load a record that exists and is not soft-deleted.
async fn find_live<R: FinanceRepository>(repo: &R, id: i64) -> Result<Finance, AppError> {
    match repo.find_by_id(id).await? {
        Some(finance) if !finance.is_deleted() => Ok(finance),
        _ => Err(not_found(id)),
    }
}

pub struct CreateFinance<R: FinanceRepository> {
    finance_repo: Arc<R>,
}

impl<R: FinanceRepository> CreateFinance<R> {
    pub fn new(finance_repo: Arc<R>) -> Self {
        Self { finance_repo }
    }

    pub async fn execute(&self, dto: CreateFinanceDto) -> Result<Finance, AppError> {
        let amount = dto
            .amount
            .ok_or_else(|| AppError::Validation(AMOUNT_REQUIRED.into()))?;
        let finance = Finance::create(
            dto.owner_id.unwrap_or_default(),
            amount,
            dto.description.unwrap_or_default(),
        )?;

        let created = self.finance_repo.create(&finance).await?;
        tracing::info!(
            finance_id = ?created.id(),
            owner_id = created.owner_id(),
            "Finance record created"
        );
        Ok(created)
    }
}

pub struct GetFinance<R: FinanceRepository> {
    finance_repo: Arc<R>,
}

impl<R: FinanceRepository> GetFinance<R> {
    pub fn new(finance_repo: Arc<R>) -> Self {
        Self { finance_repo }
    }

    pub async fn execute(&self, id: i64) -> Result<Finance, AppError> {
        find_live(self.finance_repo.as_ref(), id).await
    }
}

pub struct ListFinances<R: FinanceRepository> {
    finance_repo: Arc<R>,
}

impl<R: FinanceRepository> ListFinances<R> {
    pub fn new(finance_repo: Arc<R>) -> Self {
        Self { finance_repo }
    }

    pub async fn execute(&self, include_deleted: bool) -> Result<Vec<Finance>, AppError> {
        self.finance_repo.find_all(include_deleted).await
    }
}

pub struct ListFinancesByOwner<R: FinanceRepository> {
    finance_repo: Arc<R>,
}

impl<R: FinanceRepository> ListFinancesByOwner<R> {
    pub fn new(finance_repo: Arc<R>) -> Self {
        Self { finance_repo }
    }

    pub async fn execute(
        &self,
        owner_id: i64,
        include_deleted: bool,
    ) -> Result<Vec<Finance>, AppError> {
        self.finance_repo
            .find_by_owner(owner_id, include_deleted)
            .await
    }
}

pub struct UpdateFinance<R: FinanceRepository> {
    finance_repo: Arc<R>,
}

impl<R: FinanceRepository> UpdateFinance<R> {
    pub fn new(finance_repo: Arc<R>) -> Self {
        Self { finance_repo }
    }

    /// Merge the present fields over the stored record and persist it.
    pub async fn execute(&self, id: i64, dto: UpdateFinanceDto) -> Result<Finance, AppError> {
        let mut finance = find_live(self.finance_repo.as_ref(), id).await?;

        let amount = dto.amount.unwrap_or_else(|| finance.amount());
        let description = dto
            .description
            .unwrap_or_else(|| finance.description().to_string());
        finance.update_info(amount, description)?;

        let updated = self.finance_repo.update(id, &finance).await?;
        tracing::info!(finance_id = id, "Finance record updated");
        Ok(updated)
    }
}

pub struct DeleteFinance<R: FinanceRepository> {
    finance_repo: Arc<R>,
}

impl<R: FinanceRepository> DeleteFinance<R> {
    pub fn new(finance_repo: Arc<R>) -> Self {
        Self { finance_repo }
    }

    /// Soft-delete a live record.
    pub async fn execute(&self, id: i64) -> Result<(), AppError> {
        find_live(self.finance_repo.as_ref(), id).await?;
        self.finance_repo.soft_delete(id).await?;
        tracing::info!(finance_id = id, "Finance record soft-deleted");
        Ok(())
    }
}

/// Every finance use-case, sharing one repository.
pub struct FinanceUseCases<R: FinanceRepository> {
    pub create: CreateFinance<R>,
    pub get: GetFinance<R>,
    pub list: ListFinances<R>,
    pub list_by_owner: ListFinancesByOwner<R>,
    pub update: UpdateFinance<R>,
    pub delete: DeleteFinance<R>,
}

impl<R: FinanceRepository> FinanceUseCases<R> {
    pub fn new(finance_repo: Arc<R>) -> Self {
        Self {
            create: CreateFinance::new(finance_repo.clone()),
            get: GetFinance::new(finance_repo.clone()),
            list: ListFinances::new(finance_repo.clone()),
            list_by_owner: ListFinancesByOwner::new(finance_repo.clone()),
            update: UpdateFinance::new(finance_repo.clone()),
            delete: DeleteFinance::new(finance_repo),
        }
    }
}
