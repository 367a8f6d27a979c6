//! # Domain Entities
//!
//! Core domain entities of the two backend services. All entities map
//! directly to their corresponding database tables.
//!
//! - **User**: Account with display name, unique email and postal address
//!   (users service, `users` table)
//! - **Finance**: Signed ledger entry owned by a user
//!   (finance service, `finances` table)
//!
//! ## Repository Traits
//!
//! Each entity has an associated repository trait defining data access operations.
//! These traits are implemented in the infrastructure layer, following the
//! dependency inversion principle.

mod finance;
mod user;

pub use finance::{
    Finance, FinanceRepository, AMOUNT_OUT_OF_RANGE, AMOUNT_REQUIRED, AMOUNT_SCALE, DESCRIPTION_REQUIRED,
    MAX_DESCRIPTION_LENGTH, OWNER_ID_REQUIRED,
};
#[cfg(test)]
pub use finance::MockFinanceRepository;

pub use user::{
    User, UserRepository, UserStatus, EMAIL_INVALID, EMAIL_PATTERN, MAX_EMAIL_LENGTH,
    MAX_NAME_LENGTH, NAME_REQUIRED,
};
#[cfg(test)]
pub use user::MockUserRepository;
