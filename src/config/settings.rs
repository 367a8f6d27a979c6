//! Application settings and configuration structures.

use std::fmt;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Which of the three processes this binary runs as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceRole {
    /// HTTP edge in front of the two backend services
    Gateway,
    /// Users backend (command channel server)
    Users,
    /// Finance backend (command channel server)
    Finance,
}

impl ServiceRole {
    /// Port used when `server.port` is not configured.
    pub fn default_port(&self) -> u16 {
        match self {
            Self::Gateway => 3000,
            Self::Users => 4001,
            Self::Finance => 4002,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gateway => "gateway",
            Self::Users => "users",
            Self::Finance => "finance",
        }
    }
}

impl fmt::Display for ServiceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record store backing a backend service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Postgres,
    /// Process-local store; data is lost on exit
    Memory,
}

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Role of this process
    pub service: ServiceRole,

    /// Listener configuration (host, port)
    pub server: ServerSettings,

    /// Database configuration (PostgreSQL)
    pub database: DatabaseSettings,

    /// Record store used by the backend roles
    pub storage: StorageKind,

    /// Backend addresses used by the gateway
    pub upstream: UpstreamSettings,

    /// Command channel limits
    pub rpc: RpcSettings,

    /// CORS configuration
    pub cors: CorsSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Listener binding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,

    /// Port number to listen on; falls back to the role's default
    pub port: Option<u16>,
}

/// PostgreSQL database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Database connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections to maintain
    pub min_connections: u32,

    /// Connection acquire timeout in seconds
    pub acquire_timeout: u64,

    /// Apply the service's migrations at startup
    pub run_migrations: bool,
}

/// Where the gateway finds the backend services.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamSettings {
    /// Users service address ("host:port")
    pub users: String,

    /// Finance service address ("host:port")
    pub finance: String,

    /// Time allowed for one command round trip, in seconds
    pub request_timeout_secs: u64,
}

/// Command channel configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcSettings {
    /// Largest accepted frame in bytes, newline excluded (default: 1 MiB)
    pub max_frame_size: usize,

    /// Largest reply frame the gateway accepts from a service (default: 64 MiB)
    pub max_response_size: usize,
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins; `"*"` allows any
    pub allowed_origins: Vec<String>,
}

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. config/default.toml (base configuration)
    /// 2. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 3. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed,
    /// or if a backend role on PostgreSQL has no database URL.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        // Determine the running environment
        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("service", "gateway")?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.url", "")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.acquire_timeout", 30)?
            .set_default("database.run_migrations", true)?
            .set_default("storage", "postgres")?
            .set_default("upstream.users", "127.0.0.1:4001")?
            .set_default("upstream.finance", "127.0.0.1:4002")?
            .set_default("upstream.request_timeout_secs", 10)?
            .set_default("rpc.max_frame_size", 1_048_576_i64)? // 1 MiB
            .set_default("rpc.max_response_size", 67_108_864_i64)? // 64 MiB
            .set_default("cors.allowed_origins", vec!["http://localhost:3000"])?
            // Load from config files
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Load from environment variables
            // APP__SERVER__PORT=3000 -> server.port = 3000
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            // Map simple environment variables
            .set_override_option("service", std::env::var("SERVICE").ok())?
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("upstream.users", std::env::var("USERS_SERVICE_ADDR").ok())?
            .set_override_option(
                "upstream.finance",
                std::env::var("FINANCE_SERVICE_ADDR").ok(),
            )?
            .build()?
            .try_deserialize()
            .and_then(|settings: Self| {
                settings.validate()?;
                Ok(settings)
            })
    }

    /// Reject combinations that cannot start.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let needs_database =
            self.service != ServiceRole::Gateway && self.storage == StorageKind::Postgres;
        if needs_database && self.database.url.trim().is_empty() {
            return Err(ConfigError::Message(format!(
                "database.url (or DATABASE_URL) is required for the {} service with postgres storage",
                self.service
            )));
        }

        if self.rpc.max_frame_size == 0 || self.rpc.max_response_size == 0 {
            return Err(ConfigError::Message(
                "rpc.max_frame_size and rpc.max_response_size must be greater than zero".into(),
            ));
        }

        Ok(())
    }

    /// Port this process listens on.
    pub fn port(&self) -> u16 {
        self.server.port.unwrap_or_else(|| self.service.default_port())
    }

    /// Get the full listen address as a string.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.port())
    }
}
