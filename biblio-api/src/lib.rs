//! biblio-api library interface
//!
//! Exposes the application state and router so integration tests can
//! drive the service without binding a socket.

pub mod api;
pub mod db;
pub mod error;
pub mod validate;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool) -> Self {
        Self {
            db,
            startup_time: Utc::now(),
        }
    }
}

/// Build the application router.
///
/// CORS is permissive so a browser front end served from another origin
/// can reach the API during development.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::article_routes())
        .merge(api::reference_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
