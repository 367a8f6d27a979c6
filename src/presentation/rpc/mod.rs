//! Command Channel
//!
//! Persistent request/response channel between the gateway and the backend
//! services: newline-delimited JSON frames over TCP, correlated by id.
//!
//! - **messages**: frame and envelope types, frame I/O
//! - **dispatcher**: the seam a service plugs its handlers into
//! - **handlers**: finance and users dispatchers
//! - **server**: backend side listener
//! - **client**: gateway side multiplexing client

pub mod client;
pub mod dispatcher;
pub mod handlers;
pub mod messages;
pub mod server;

pub use client::{CommandChannel, RpcClient};
pub use dispatcher::CommandDispatcher;
pub use handlers::{FinanceDispatcher, UserDispatcher};
pub use messages::{Envelope, RequestFrame, ResponseFrame, NO_MATCHING_HANDLER};
pub use server::RpcServer;
