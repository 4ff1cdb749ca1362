//! RestiqueLayer - Router assembly
//!
//! This module provides the main entry point for serving a database over
//! HTTP, either standalone or merged into an existing Axum application.

use crate::api::create_api_router;
use crate::database::sqlite::SqliteProvider;
use crate::database::traits::DatabaseProvider;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Read-only REST API over the tables of a database
///
/// # Example
///
/// ```rust,no_run
/// use axum::Router;
/// use restique::RestiqueLayer;
/// use sqlx::SqlitePool;
///
/// # async fn example() {
/// let pool = SqlitePool::connect("sqlite:app.db").await.unwrap();
/// let app = Router::new().merge(RestiqueLayer::sqlite("/api", pool).into_router());
/// # }
/// ```
pub struct RestiqueLayer<DB: DatabaseProvider> {
    base_path: String,
    database: Arc<DB>,
}

impl<DB: DatabaseProvider> RestiqueLayer<DB> {
    /// Create a new API at the given base path
    ///
    /// # Arguments
    ///
    /// * `base_path` - URL prefix for all routes; empty or "/" serves at the root,
    ///   a missing leading "/" is added
    /// * `database` - The database provider implementation
    pub fn new(base_path: impl Into<String>, database: DB) -> Self {
        Self {
            base_path: base_path.into(),
            database: Arc::new(database),
        }
    }

    /// Convert into an Axum Router that can be served or merged
    ///
    /// The returned router includes:
    /// - `GET {base_path}/` listing tables
    /// - `GET {base_path}/{table_name}` listing rows
    /// - `GET {base_path}/{table_name}/{primary_key}` fetching one row
    /// - Permissive CORS and HTTP request tracing
    pub fn into_router(self) -> Router {
        let api_router = create_api_router(self.database);
        let base_path = normalize_base_path(&self.base_path);

        let router = if base_path.is_empty() {
            api_router
        } else {
            Router::new().nest(&base_path, api_router)
        };

        router
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }
}

/// Strip trailing slashes and ensure a leading one; "" means the root
fn normalize_base_path(base_path: &str) -> String {
    let trimmed = base_path.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

impl RestiqueLayer<SqliteProvider> {
    /// Create a new API for SQLite
    ///
    /// # Arguments
    ///
    /// * `base_path` - URL prefix for all routes
    /// * `pool` - The SQLite connection pool
    pub fn sqlite(base_path: impl Into<String>, pool: sqlx::SqlitePool) -> Self {
        Self::new(base_path, SqliteProvider::new(pool))
    }
}
