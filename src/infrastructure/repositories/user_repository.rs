//! User Repository Implementation
//!
//! PostgreSQL implementation of the UserRepository trait.
//! Maps between the `users` table and the domain User entity.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::application::use_cases::EMAIL_ALREADY_REGISTERED;
use crate::domain::{Address, Lifecycle, User, UserRepository, UserStatus};
use crate::shared::error::AppError;

const USER_COLUMNS: &str = "id, nome, email, rua, numero, bairro, complemento, cidade, estado, \
                            cep, status, is_deleted, created, updated, deleted";

/// Database row representation of the users table.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    nome: String,
    email: String,
    rua: String,
    numero: String,
    bairro: String,
    complemento: Option<String>,
    cidade: String,
    estado: String,
    cep: String,
    status: String,
    is_deleted: bool,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
    deleted: Option<DateTime<Utc>>,
}

impl UserRow {
    /// Convert database row to domain User entity.
    fn into_user(self) -> Result<User, AppError> {
        let id = self.id;
        let corrupt = |e: AppError| AppError::Internal(format!("users row {} is invalid: {}", id, e));

        let address = Address::new(
            self.rua,
            self.numero,
            self.bairro,
            self.complemento,
            self.cidade,
            self.estado,
            self.cep,
        )
        .map_err(corrupt)?;
        let status = self.status.parse::<UserStatus>().map_err(corrupt)?;

        User::restore(
            id,
            self.nome,
            self.email,
            address,
            status,
            Lifecycle {
                is_deleted: self.is_deleted,
                created: self.created,
                updated: self.updated,
                deleted: self.deleted,
            },
        )
        .map_err(corrupt)
    }
}

/// Unique violations can only come from the live-email index.
fn map_write_error(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict(EMAIL_ALREADY_REGISTERED.to_string())
        }
        _ => AppError::Database(e),
    }
}

/// PostgreSQL user repository implementation.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new PgUserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: &User) -> Result<User, AppError> {
        let address = user.address();
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (nome, email, rua, numero, bairro, complemento, cidade, estado, cep, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.name())
        .bind(user.email())
        .bind(address.street())
        .bind(address.number())
        .bind(address.neighborhood())
        .bind(address.complement())
        .bind(address.city())
        .bind(address.state())
        .bind(address.postal_code())
        .bind(user.status().as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        row.into_user()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE email = $1
            ORDER BY is_deleted ASC, id DESC
            LIMIT 1
            "#
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_all(&self, include_deleted: bool) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE ($1 OR NOT is_deleted)
            ORDER BY id ASC
            "#
        ))
        .bind(include_deleted)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    async fn update(&self, id: i64, user: &User) -> Result<User, AppError> {
        let address = user.address();
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
            SET nome = $2,
                email = $3,
                rua = $4,
                numero = $5,
                bairro = $6,
                complemento = $7,
                cidade = $8,
                estado = $9,
                cep = $10,
                status = $11,
                updated = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user.name())
        .bind(user.email())
        .bind(address.street())
        .bind(address.number())
        .bind(address.neighborhood())
        .bind(address.complement())
        .bind(address.city())
        .bind(address.state())
        .bind(address.postal_code())
        .bind(user.status().as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?
        .ok_or_else(|| AppError::NotFound(format!("User with ID {} not found", id)))?;

        row.into_user()
    }

    async fn soft_delete(&self, id: i64) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE users
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
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
