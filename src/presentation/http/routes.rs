//! Route Configuration
//!
//! Configures all HTTP routes of the gateway.

use axum::{
    response::IntoResponse,
    routing::get,
    Router,
};

use super::handlers;
use crate::infrastructure::metrics;
use crate::startup::AppState;

/// Create the gateway router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/users", user_routes())
        .nest("/finance", finance_routes())
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    let metrics = metrics::gather_metrics();
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics,
    )
}

/// User routes
fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::user::list_users).post(handlers::user::create_user),
        )
        .route(
            "/{id}",
            get(handlers::user::get_user)
                .put(handlers::user::update_user)
                .delete(handlers::user::delete_user),
        )
}

/// Finance routes
fn finance_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::finance::list_finances).post(handlers::finance::create_finance),
        )
        .route(
            "/user/{owner_id}",
            get(handlers::finance::list_finances_by_owner),
        )
        .route(
            "/{id}",
            get(handlers::finance::get_finance)
                .put(handlers::finance::update_finance)
                .delete(handlers::finance::delete_finance),
        )
}
