//! Per-service command handlers
//!
//! - **finance**: finance service dispatcher and its command tags
//! - **user**: users service dispatcher and its command tags

pub mod finance;
pub mod user;

use serde::Deserialize;

pub use finance::{FinanceCommand, FinanceDispatcher, FINANCE_DELETED};
pub use user::{UserCommand, UserDispatcher, USER_DELETED};

/// `{ "id": <record id> }` payload of the get and delete commands.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct IdPayload {
    pub id: i64,
}
