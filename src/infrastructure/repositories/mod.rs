//! Repository Implementations
//!
//! Implementations of the domain repository traits.
//!
//! ## Available Repositories
//!
//! - **PgUserRepository** / **InMemoryUserRepository** - user records
//! - **PgFinanceRepository** / **InMemoryFinanceRepository** - finance records
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use sqlx::PgPool;
//! use crate::infrastructure::repositories::{PgFinanceRepository, PgUserRepository};
//!
//! async fn setup_repositories(pool: PgPool) {
//!     let user_repo = PgUserRepository::new(pool.clone());
//!     let finance_repo = PgFinanceRepository::new(pool);
//! }
//! ```

pub mod finance_repository;
pub mod memory;
pub mod user_repository;

pub use finance_repository::PgFinanceRepository;
pub use memory::{InMemoryFinanceRepository, InMemoryUserRepository};
pub use user_repository::PgUserRepository;
