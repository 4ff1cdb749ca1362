//! REST API endpoints
//!
//! This module contains the read-only endpoint handlers and the mapping from
//! database errors to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::database::traits::{DatabaseError, DatabaseProvider};

pub mod guard;
pub mod rows;
pub mod tables;

// Re-export handlers for convenience
pub use guard::ValidTable;
pub use rows::{get_row_handler, get_rows_handler};
pub use tables::list_tables_handler;

/// Create the API router with all endpoints
///
/// # Arguments
///
/// * `database` - Arc-wrapped database provider implementation
///
/// # Returns
///
/// An Axum Router serving `/`, `/{table_name}` and `/{table_name}/{primary_key}`
pub fn create_api_router<DB: DatabaseProvider>(database: Arc<DB>) -> Router {
    Router::new()
        .route("/", get(list_tables_handler::<DB>))
        .route("/{table_name}", get(get_rows_handler::<DB>))
        .route("/{table_name}/{primary_key}", get(get_row_handler::<DB>))
        .with_state(database)
}

impl DatabaseError {
    /// HTTP status reported for this error
    ///
    /// A missing row is reported as a server error, like any other failed
    /// lookup; the body still names the condition.
    pub fn status_code(&self) -> StatusCode {
        match self {
            DatabaseError::InvalidIdentifier(_) | DatabaseError::SchemaNotFound(_) => {
                StatusCode::BAD_REQUEST
            }
            DatabaseError::RowNotFound { .. } | DatabaseError::Query(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for DatabaseError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(serde_json::json!({
                "error": self.to_string()
            })),
        )
            .into_response()
    }
}
