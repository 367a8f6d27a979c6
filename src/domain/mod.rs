//! # Domain Layer
//!
//! The domain layer contains the business rules shared by the users and
//! finance services. It is independent of any external frameworks or
//! infrastructure concerns.
//!
//! ## Structure
//!
//! - **entities**: Self-validating entities (User, Finance) and their
//!   repository traits
//! - **value_objects**: Immutable value types (Address, Lifecycle)
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Entities can never be observed in an invalid state
//! - Repository traits define data access contracts

pub mod entities;
pub mod value_objects;

// Re-export commonly used types
pub use entities::*;
pub use value_objects::*;
