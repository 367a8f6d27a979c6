//! Application Startup
//!
//! Builds the process for its configured role: the HTTP gateway, or one of the
//! two backend services serving the command channel.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;

use crate::config::{CorsSettings, ServiceRole, Settings, StorageKind};
use crate::infrastructure::database;
use crate::infrastructure::repositories::{
    InMemoryFinanceRepository, InMemoryUserRepository, PgFinanceRepository, PgUserRepository,
};
use crate::presentation::http::{create_router, handlers::health};
use crate::presentation::middleware::{create_cors_layer, create_trace_layer};
use crate::presentation::rpc::{
    CommandChannel, CommandDispatcher, FinanceDispatcher, RpcClient, RpcServer, UserDispatcher,
};

/// Application state shared across gateway handlers
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn CommandChannel>,
    pub finance: Arc<dyn CommandChannel>,
}

enum Role {
    Gateway { listener: TcpListener, router: Router },
    Backend { server: RpcServer },
}

/// Application instance
pub struct Application {
    service: ServiceRole,
    role: Role,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        let role = match settings.service {
            ServiceRole::Gateway => build_gateway(&settings).await?,
            ServiceRole::Users | ServiceRole::Finance => build_backend(&settings).await?,
        };

        Ok(Self {
            service: settings.service,
            role,
        })
    }

    /// Role this process runs as
    pub fn service(&self) -> ServiceRole {
        self.service
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        match &self.role {
            Role::Gateway { listener, .. } => listener.local_addr(),
            Role::Backend { server } => server.local_addr(),
        }
    }

    /// Run until Ctrl-C
    pub async fn run_until_stopped(self) -> Result<()> {
        match self.role {
            Role::Gateway { listener, router } => {
                axum::serve(listener, router)
                    .with_graceful_shutdown(shutdown_signal())
                    .await?;
            }
            Role::Backend { server } => server.run(shutdown_signal()).await?,
        }
        Ok(())
    }
}

async fn build_gateway(settings: &Settings) -> Result<Role> {
    let timeout = Duration::from_secs(settings.upstream.request_timeout_secs);
    let max_response_size = settings.rpc.max_response_size;

    let state = AppState {
        users: Arc::new(RpcClient::new(
            ServiceRole::Users.as_str(),
            settings.upstream.users.clone(),
            timeout,
            max_response_size,
        )),
        finance: Arc::new(RpcClient::new(
            ServiceRole::Finance.as_str(),
            settings.upstream.finance.clone(),
            timeout,
            max_response_size,
        )),
    };
    tracing::info!(
        users = %settings.upstream.users,
        finance = %settings.upstream.finance,
        "Backend services configured"
    );

    health::init_server_start();

    let router = gateway_router(state, &settings.cors);

    let addr = settings.server_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    Ok(Role::Gateway { listener, router })
}

/// Gateway routes wrapped in the request tracing and CORS layers.
pub fn gateway_router(state: AppState, cors: &CorsSettings) -> Router {
    create_router(state)
        .layer(create_trace_layer())
        .layer(create_cors_layer(cors))
}

async fn build_backend(settings: &Settings) -> Result<Role> {
    let dispatcher: Arc<dyn CommandDispatcher> = match settings.storage {
        StorageKind::Memory => {
            tracing::warn!(service = %settings.service, "Using in-memory storage; data is lost on exit");
            match settings.service {
                ServiceRole::Users => Arc::new(UserDispatcher::new(Arc::new(InMemoryUserRepository::new()))),
                _ => Arc::new(FinanceDispatcher::new(Arc::new(InMemoryFinanceRepository::new()))),
            }
        }
        StorageKind::Postgres => {
            let pool = database::create_pool(&settings.database)
                .await
                .context("failed to connect to PostgreSQL")?;
            tracing::info!("Database connection pool created");

            if settings.database.run_migrations {
                database::run_migrations(&pool, settings.service)
                    .await
                    .context("failed to run migrations")?;
                tracing::info!(service = %settings.service, "Migrations applied");
            }

            match settings.service {
                ServiceRole::Users => Arc::new(UserDispatcher::new(Arc::new(PgUserRepository::new(pool)))),
                _ => Arc::new(FinanceDispatcher::new(Arc::new(PgFinanceRepository::new(pool)))),
            }
        }
    };

    let addr = settings.server_addr();
    let server = RpcServer::bind(&addr, dispatcher, settings.rpc.max_frame_size)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    Ok(Role::Backend { server })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
