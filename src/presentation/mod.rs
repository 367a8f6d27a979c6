//! Presentation Layer
//!
//! HTTP gateway and the command channel served by the backend services.

pub mod http;
pub mod middleware;
pub mod rpc;
