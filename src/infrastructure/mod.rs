//! Infrastructure Layer
//!
//! Contains implementations for external services including:
//! - Database pool and migrations (PostgreSQL)
//! - Repositories (PostgreSQL and in-memory)
//! - Prometheus metrics

pub mod database;
pub mod metrics;
pub mod repositories;
