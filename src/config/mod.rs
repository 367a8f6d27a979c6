//! # Configuration Module
//!
//! This module handles application configuration loading and management.
//! Configuration can be loaded from:
//! - Environment variables (prefixed with APP__, plus SERVICE, SERVER_HOST,
//!   SERVER_PORT, DATABASE_URL, USERS_SERVICE_ADDR, FINANCE_SERVICE_ADDR)
//! - Configuration files (config/default.toml, config/{environment}.toml)
//! - .env files (via dotenvy)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use accounts_ledger::config::Settings;
//!
//! let settings = Settings::load()?;
//! println!("{} will listen on {}", settings.service, settings.server_addr());
//! ```

mod settings;

pub use settings::*;
