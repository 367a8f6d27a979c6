//! Database Module
//!
//! PostgreSQL connection pool and per-service migrations.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

use crate::config::{DatabaseSettings, ServiceRole};

/// Create a PostgreSQL connection pool
pub async fn create_pool(settings: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout))
        .connect(&settings.url)
        .await
}

/// Run the migrations of the table owned by `role`.
///
/// The gateway owns no table; calling this for it is a no-op.
pub async fn run_migrations(pool: &PgPool, role: ServiceRole) -> Result<(), sqlx::migrate::MigrateError> {
    match role {
        ServiceRole::Users => sqlx::migrate!("./migrations/users").run(pool).await,
        ServiceRole::Finance => sqlx::migrate!("./migrations/finance").run(pool).await,
        ServiceRole::Gateway => Ok(()),
    }
}
