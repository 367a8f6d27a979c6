//! Use-Cases
//!
//! One operation object per backend command, generic over the repository
//! trait it depends on.
//!
//! - **finance**: create, get, list, list by owner, update, delete
//! - **user**: create, get, list (search + pagination), update, delete

pub mod finance;
pub mod user;

pub use finance::{
    CreateFinance, DeleteFinance, FinanceUseCases, GetFinance, ListFinances, ListFinancesByOwner,
    UpdateFinance,
};
pub use user::{
    CreateUser, DeleteUser, GetUser, ListUsers, UpdateUser, UserUseCases,
    EMAIL_ALREADY_REGISTERED,
};
