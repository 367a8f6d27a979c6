//! Finance Repository Implementation
//!
//! PostgreSQL implementation of the FinanceRepository trait.
//! Maps between the `finances` table and the domain Finance entity.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::domain::{Finance, FinanceRepository, Lifecycle};
use crate::shared::error::AppError;

const FINANCE_COLUMNS: &str =
    "id, user_id, valor, descricao, is_deleted, created, updated, deleted";

/// Database row representation of the finances table.
#[derive(Debug, sqlx::FromRow)]
struct FinanceRow {
    id: i64,
    user_id: i64,
    valor: Decimal,
    descricao: String,
    is_deleted: bool,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
    deleted: Option<DateTime<Utc>>,
}

impl FinanceRow {
    /// Convert database row to domain Finance entity.
    fn into_finance(self) -> Result<Finance, AppError> {
        let id = self.id;
        Finance::restore(
            id,
            self.user_id,
            self.valor,
            self.descricao,
            Lifecycle {
                is_deleted: self.is_deleted,
                created: self.created,
                updated: self.updated,
                deleted: self.deleted,
            },
        )
        .map_err(|e| AppError::Internal(format!("finances row {} is invalid: {}", id, e)))
    }
}

/// PostgreSQL finance repository implementation.
#[derive(Clone)]
pub struct PgFinanceRepository {
    pool: PgPool,
}

impl PgFinanceRepository {
    /// Create a new PgFinanceRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FinanceRepository for PgFinanceRepository {
    async fn create(&self, finance: &Finance) -> Result<Finance, AppError> {
        let row = sqlx::query_as::<_, FinanceRow>(&format!(
            r#"
            INSERT INTO finances (user_id, valor, descricao)
            VALUES ($1, $2, $3)
            RETURNING {FINANCE_COLUMNS}
            "#
        ))
        .bind(finance.owner_id())
        .bind(finance.amount())
        .bind(finance.description())
        .fetch_one(&self.pool)
        .await?;

        row.into_finance()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Finance>, AppError> {
        let row = sqlx::query_as::<_, FinanceRow>(&format!(
            "SELECT {FINANCE_COLUMNS} FROM finances WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(FinanceRow::into_finance).transpose()
    }

    async fn find_all(&self, include_deleted: bool) -> Result<Vec<Finance>, AppError> {
        let rows = sqlx::query_as::<_, FinanceRow>(&format!(
            r#"
            SELECT {FINANCE_COLUMNS}
            FROM finances
            WHERE ($1 OR NOT is_deleted)
            ORDER BY id ASC
            "#
        ))
        .bind(include_deleted)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(FinanceRow::into_finance).collect()
    }

    async fn find_by_owner(
        &self,
        owner_id: i64,
        include_deleted: bool,
    ) -> Result<Vec<Finance>, AppError> {
        let rows = sqlx::query_as::<_, FinanceRow>(&format!(
            r#"
            SELECT {FINANCE_COLUMNS}
            FROM finances
            WHERE user_id = $1 AND ($2 OR NOT is_deleted)
            ORDER BY id ASC
            "#
        ))
        .bind(owner_id)
        .bind(include_deleted)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(FinanceRow::into_finance).collect()
    }

    async fn update(&self, id: i64, finance: &Finance) -> Result<Finance, AppError> {
        let row = sqlx::query_as::<_, FinanceRow>(&format!(
            r#"
            UPDATE finances
            SET valor = $2,
                descricao = $3,
                updated = NOW()
            WHERE id = $1
            RETURNING {FINANCE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(finance.amount())
        .bind(finance.description())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Finance record with ID {} not found", id)))?;

        row.into_finance()
    }

    async fn soft_delete(&self, id: i64) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE finances
            SET is_deleted = TRUE, deleted = NOW(), updated = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn hard_delete(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM finances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
