//! Table listing endpoint

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

use crate::database::traits::DatabaseProvider;

/// Handler for GET /
///
/// Returns the names of all tables in the database as a JSON array.
///
/// Response:
/// ```json
/// ["users", "orders"]
/// ```
///
/// # Arguments
///
/// * `database` - Database provider from state
pub async fn list_tables_handler<DB: DatabaseProvider>(
    State(database): State<Arc<DB>>,
) -> Response {
    match database.list_tables().await {
        Ok(tables) => (StatusCode::OK, Json(tables)).into_response(),
        Err(error) => {
            tracing::error!("Failed to list tables: {}", error);
            error.into_response()
        }
    }
}
