//! Row fetching endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

use crate::api::guard::ValidTable;
use crate::database::traits::{DatabaseError, DatabaseProvider};
use crate::identifier::TableName;
use crate::schema::Row;

/// Handler for GET /{table_name}
///
/// Returns every row of the table as a JSON array of objects. An empty
/// table yields `[]`.
///
/// # Arguments
///
/// * `database` - Database provider from state
/// * `table` - Validated table name from the path
pub async fn get_rows_handler<DB: DatabaseProvider>(
    State(database): State<Arc<DB>>,
    ValidTable(table): ValidTable,
) -> Response {
    match database.fetch_all_rows(&table).await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(error) => {
            tracing::error!("Failed to get rows from table '{}': {}", table, error);
            error.into_response()
        }
    }
}

/// Handler for GET /{table_name}/{primary_key}
///
/// Looks up the table's primary key column, then returns the first row whose
/// key equals the path value as a JSON object.
///
/// # Arguments
///
/// * `database` - Database provider from state
/// * `table` - Validated table name from the path
/// * `primary_key` - Key value, bound as a query parameter
pub async fn get_row_handler<DB: DatabaseProvider>(
    State(database): State<Arc<DB>>,
    ValidTable(table): ValidTable,
    Path((_, primary_key)): Path<(String, String)>,
) -> Response {
    match fetch_row(database.as_ref(), &table, &primary_key).await {
        Ok(row) => (StatusCode::OK, Json(row)).into_response(),
        Err(error) => {
            match &error {
                DatabaseError::SchemaNotFound(_) | DatabaseError::RowNotFound { .. } => {
                    tracing::warn!("Lookup in table '{}' failed: {}", table, error);
                }
                _ => {
                    tracing::error!("Failed to get row from table '{}': {}", table, error);
                }
            }
            error.into_response()
        }
    }
}

async fn fetch_row<DB: DatabaseProvider>(
    database: &DB,
    table: &TableName,
    primary_key: &str,
) -> Result<Row, DatabaseError> {
    let key_column = database.primary_key_column(table).await?;
    database
        .fetch_row_by_key(table, &key_column, primary_key)
        .await
}
