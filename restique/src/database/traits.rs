//! Database provider trait
//!
//! This trait defines the read-only operations the REST API needs from a
//! database. The provider is passed explicitly to the router, so handlers can
//! be tested against an in-memory database.

use crate::identifier::TableName;
use crate::schema::{ColumnDescriptor, Row};
use async_trait::async_trait;
use thiserror::Error;

/// Database provider trait for schema discovery and data access
#[async_trait]
pub trait DatabaseProvider: Send + Sync + 'static {
    /// List all table names in the catalog
    ///
    /// Names are returned in catalog order, without filtering internal tables.
    async fn list_tables(&self) -> Result<Vec<String>, DatabaseError>;

    /// Get column metadata for a table, in natural column order
    ///
    /// A nonexistent table yields an empty list rather than an error.
    async fn table_columns(&self, table: &TableName)
        -> Result<Vec<ColumnDescriptor>, DatabaseError>;

    /// Name of the leading primary key column
    ///
    /// For a composite key this is the column at key position 1, regardless
    /// of where it sits in the table's column order.
    ///
    /// # Errors
    ///
    /// [`DatabaseError::SchemaNotFound`] when no column is flagged, which
    /// includes the case where the table does not exist.
    async fn primary_key_column(&self, table: &TableName) -> Result<String, DatabaseError> {
        let columns = self.table_columns(table).await?;
        columns
            .into_iter()
            .filter_map(|column| Some((column.primary_key_position?, column.name)))
            .min_by_key(|(position, _)| *position)
            .map(|(_, name)| name)
            .ok_or_else(|| DatabaseError::SchemaNotFound(table.to_string()))
    }

    /// Fetch every row of a table
    async fn fetch_all_rows(&self, table: &TableName) -> Result<Vec<Row>, DatabaseError>;

    /// Fetch the first row whose `key_column` equals `key_value`
    ///
    /// `key_value` is bound as a query parameter. `key_column` must come from
    /// [`DatabaseProvider::primary_key_column`], never from user input.
    ///
    /// # Errors
    ///
    /// [`DatabaseError::RowNotFound`] when nothing matches.
    async fn fetch_row_by_key(
        &self,
        table: &TableName,
        key_column: &str,
        key_value: &str,
    ) -> Result<Row, DatabaseError>;
}

/// Database error type
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Table name failed identifier validation
    #[error("Invalid table name: {0}")]
    InvalidIdentifier(String),

    /// Table has no primary key column, or does not exist
    #[error("No primary key found for table {0}")]
    SchemaNotFound(String),

    /// Primary key lookup matched no rows
    #[error("Row not found: no row in {table} with {column} = {value}")]
    RowNotFound {
        table: String,
        column: String,
        value: String,
    },

    /// Any failure reported by the database engine
    #[error("Database error: {0}")]
    Query(String),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        DatabaseError::Query(error.to_string())
    }
}
