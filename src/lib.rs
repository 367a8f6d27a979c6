//! # Accounts Ledger Library
//!
//! User and finance record services behind an HTTP gateway:
//! - RESTful HTTP API on the gateway
//! - Newline-delimited JSON command channel between gateway and services
//! - PostgreSQL (or in-memory) storage in each backend service
//!
//! ## Architecture
//!
//! - **Domain Layer**: Entities, value objects and repository traits
//! - **Application Layer**: Use cases and DTOs
//! - **Infrastructure Layer**: Database, repositories and metrics
//! - **Presentation Layer**: HTTP gateway and command channel
//!
//! ## Module Structure
//!
//! ```text
//! accounts_ledger/
//! +-- config/         Configuration management
//! +-- domain/         Entities, value objects, and traits
//! +-- application/    Use cases and DTOs
//! +-- infrastructure/ Database, repositories, metrics
//! +-- presentation/   HTTP routes and command channel
//! +-- shared/         Common utilities (errors, validation)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Use cases
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP gateway and command channel
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
