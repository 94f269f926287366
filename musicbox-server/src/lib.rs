//! musicbox-server library interface
//!
//! Exposes the services, database layer and router for the binary and for
//! integration tests.

pub mod api;
pub mod db;
pub mod error;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::path::PathBuf;
use tower_http::trace::TraceLayer;

use crate::services::{ContentStore, EntitlementManager};

/// Module name used for config file lookup and health reporting
pub const MODULE_NAME: &str = "musicbox-server";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub entitlements: EntitlementManager,
    pub content: ContentStore,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, upload_root: PathBuf) -> Self {
        Self {
            entitlements: EntitlementManager::new(db.clone()),
            content: ContentStore::new(db.clone(), upload_root),
            db,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// `max_upload_bytes` bounds every request body, uploads included.
pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::user_routes())
        .merge(api::catalog_routes())
        .merge(api::playlist_routes())
        .merge(api::subscription_routes())
        .merge(api::audio_routes())
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
