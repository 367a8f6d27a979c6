//! # Domain Value Objects
//!
//! Immutable value types that represent domain concepts without identity.
//!
//! ## Value Objects
//!
//! - **Address**: Postal address embedded in a user record
//! - **Lifecycle**: Soft-delete flag and record timestamps

mod address;
mod lifecycle;

pub use address::*;
pub use lifecycle::*;
