//! HTTP Gateway
//!
//! Routes, handlers and extractors of the edge service.

pub mod extractors;
pub mod handlers;
pub mod routes;

pub use routes::create_router;
