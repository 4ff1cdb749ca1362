//! SQLite database provider implementation

use crate::config::ServerConfig;
use crate::database::traits::{DatabaseError, DatabaseProvider};
use crate::identifier::TableName;
use crate::schema::{ColumnDescriptor, ColumnValue, Row};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteColumn, SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Row as _, SqlitePool, TypeInfo, ValueRef};

/// Open a connection pool on an existing SQLite file
///
/// The configuration is validated first. The file is never created, and one
/// connection is opened eagerly so that an unreadable database fails here
/// rather than on the first request.
pub async fn connect(config: &ServerConfig) -> crate::Result<SqlitePool> {
    config.validate()?;

    let options = SqliteConnectOptions::new()
        .filename(&config.database_path)
        .create_if_missing(false);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
        .map_err(DatabaseError::from)?;

    tracing::info!(path = %config.database_path.display(), "Opened SQLite database");
    Ok(pool)
}

/// SQLite database provider
pub struct SqliteProvider {
    pool: SqlitePool,
}

impl SqliteProvider {
    /// Create a new SQLite provider
    ///
    /// # Arguments
    ///
    /// * `pool` - SQLite connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Quote a column name read back from the catalog
    ///
    /// Table names are validated and interpolated as-is; column names come
    /// from `PRAGMA table_info` and may contain any character.
    fn quote_identifier(identifier: &str) -> String {
        format!("\"{}\"", identifier.replace('"', "\"\""))
    }

    /// Convert a SQLite row into an ordered [`Row`]
    fn row_to_values(row: &SqliteRow) -> Result<Row, DatabaseError> {
        let mut values = Row::with_capacity(row.len());

        for column in row.columns() {
            let value = Self::extract_column_value(row, column)?;
            values.push(column.name(), value);
        }

        Ok(values)
    }

    /// Extract a column value based on the storage class of the stored value
    ///
    /// SQLite is dynamically typed, so the declared column type is only
    /// consulted to surface BOOLEAN columns as booleans. Text and blobs are
    /// both read as bytes and decoded as (lossy) UTF-8.
    fn extract_column_value(
        row: &SqliteRow,
        column: &SqliteColumn,
    ) -> Result<ColumnValue, DatabaseError> {
        let index = column.ordinal();
        let raw = row.try_get_raw(index)?;
        if raw.is_null() {
            return Ok(ColumnValue::Null);
        }

        let declared_boolean = column.type_info().name() == "BOOLEAN";
        let storage_class = raw.type_info();

        let value = match storage_class.name() {
            "INTEGER" => {
                let value: i64 = row.try_get_unchecked(index)?;
                if declared_boolean {
                    ColumnValue::Boolean(value != 0)
                } else {
                    ColumnValue::Integer(value)
                }
            }
            "REAL" => ColumnValue::Float(row.try_get_unchecked::<f64, _>(index)?),
            _ => {
                let bytes: Vec<u8> = row.try_get_unchecked(index)?;
                ColumnValue::Text(String::from_utf8_lossy(&bytes).into_owned())
            }
        };

        Ok(value)
    }
}

#[async_trait]
impl DatabaseProvider for SqliteProvider {
    async fn list_tables(&self) -> Result<Vec<String>, DatabaseError> {
        let query = "SELECT name FROM sqlite_master WHERE type='table'";

        let tables = sqlx::query_scalar::<_, String>(query)
            .fetch_all(&self.pool)
            .await?;

        Ok(tables)
    }

    async fn table_columns(
        &self,
        table: &TableName,
    ) -> Result<Vec<ColumnDescriptor>, DatabaseError> {
        let query = format!("PRAGMA table_info({})", table);
        tracing::debug!(sql = %query, "Inspecting table");

        let column_rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        let mut columns = Vec::with_capacity(column_rows.len());
        for row in column_rows {
            // PRAGMA table_info returns: cid, name, type, notnull, dflt_value, pk
            let name: String = row.try_get("name")?;
            let declared_type: String = row.try_get("type")?;
            let not_null: i64 = row.try_get("notnull")?;
            let default_value: Option<String> = row.try_get("dflt_value")?;
            let primary_key: i64 = row.try_get("pk")?;

            columns.push(ColumnDescriptor {
                name,
                declared_type,
                not_null: not_null != 0,
                default_value,
                is_primary_key: primary_key > 0,
                primary_key_position: u32::try_from(primary_key)
                    .ok()
                    .filter(|position| *position > 0),
            });
        }

        Ok(columns)
    }

    async fn fetch_all_rows(&self, table: &TableName) -> Result<Vec<Row>, DatabaseError> {
        let query = format!("SELECT * FROM {}", table);
        tracing::debug!(sql = %query, "Fetching rows");

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        rows.iter().map(Self::row_to_values).collect()
    }

    async fn fetch_row_by_key(
        &self,
        table: &TableName,
        key_column: &str,
        key_value: &str,
    ) -> Result<Row, DatabaseError> {
        let query = format!(
            "SELECT * FROM {} WHERE {} = ?",
            table,
            Self::quote_identifier(key_column)
        );
        tracing::debug!(sql = %query, "Fetching row by key");

        let row = sqlx::query(&query)
            .bind(key_value)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Self::row_to_values(&row),
            None => Err(DatabaseError::RowNotFound {
                table: table.to_string(),
                column: key_column.to_string(),
                value: key_value.to_string(),
            }),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::path::PathBuf;

    /// Single-connection in-memory pool, so every query sees the same database
    pub(crate) async fn memory_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    pub(crate) async fn execute_all(pool: &SqlitePool, statements: &[&str]) {
        for statement in statements {
            sqlx::query(statement).execute(pool).await.unwrap();
        }
    }

    async fn users_provider() -> SqliteProvider {
        let pool = memory_pool().await;
        execute_all(
            &pool,
            &[
                "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)",
                "CREATE TABLE orders (order_id INTEGER, user_id INTEGER NOT NULL, total REAL DEFAULT 0)",
                "INSERT INTO users (id, name) VALUES (1, 'Ann')",
                "INSERT INTO users (id, name) VALUES (2, 'Bob')",
            ],
        )
        .await;
        SqliteProvider::new(pool)
    }

    fn table(name: &str) -> TableName {
        TableName::new(name).unwrap()
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(SqliteProvider::quote_identifier("id"), "\"id\"");
        assert_eq!(
            SqliteProvider::quote_identifier("key\"column"),
            "\"key\"\"column\""
        );
    }

    #[tokio::test]
    async fn test_list_tables() {
        let provider = users_provider().await;
        let mut tables = provider.list_tables().await.unwrap();
        tables.sort();
        assert_eq!(tables, vec!["orders", "users"]);
    }

    #[tokio::test]
    async fn test_list_tables_empty_database() {
        let provider = SqliteProvider::new(memory_pool().await);
        assert!(provider.list_tables().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_table_columns() {
        let provider = users_provider().await;
        let columns = provider.table_columns(&table("orders")).await.unwrap();

        let names: Vec<_> = columns.iter().map(|column| column.name.as_str()).collect();
        assert_eq!(names, vec!["order_id", "user_id", "total"]);
        assert_eq!(columns[1].declared_type, "INTEGER");
        assert!(columns[1].not_null);
        assert!(!columns[0].not_null);
        assert_eq!(columns[2].default_value.as_deref(), Some("0"));
        assert!(columns.iter().all(|column| !column.is_primary_key));
    }

    #[tokio::test]
    async fn test_primary_key_column() {
        let provider = users_provider().await;
        assert_eq!(provider.primary_key_column(&table("users")).await.unwrap(), "id");
    }

    #[tokio::test]
    async fn test_primary_key_missing() {
        let provider = users_provider().await;
        let error = provider.primary_key_column(&table("orders")).await.unwrap_err();
        assert!(matches!(error, DatabaseError::SchemaNotFound(ref name) if name == "orders"));
    }

    #[tokio::test]
    async fn test_primary_key_of_nonexistent_table() {
        let provider = users_provider().await;
        let error = provider.primary_key_column(&table("ghosts")).await.unwrap_err();
        assert!(matches!(error, DatabaseError::SchemaNotFound(_)));
    }

    #[tokio::test]
    async fn test_primary_key_composite_uses_leading_key_column() {
        let provider = users_provider().await;
        execute_all(
            &provider.pool,
            &["CREATE TABLE memberships (note TEXT, user_id INTEGER, group_id INTEGER, PRIMARY KEY (group_id, user_id))"],
        )
        .await;
        let key = provider.primary_key_column(&table("memberships")).await.unwrap();
        assert_eq!(key, "group_id");

        let columns = provider.table_columns(&table("memberships")).await.unwrap();
        let positions: Vec<_> = columns
            .iter()
            .map(|column| column.primary_key_position)
            .collect();
        assert_eq!(positions, vec![None, Some(2), Some(1)]);
    }

    #[tokio::test]
    async fn test_fetch_all_rows() {
        let provider = users_provider().await;
        let rows = provider.fetch_all_rows(&table("users")).await.unwrap();
        assert_eq!(
            serde_json::to_string(&rows).unwrap(),
            r#"[{"id":1,"name":"Ann"},{"id":2,"name":"Bob"}]"#
        );
    }

    #[tokio::test]
    async fn test_fetch_all_rows_empty_table() {
        let provider = users_provider().await;
        let rows = provider.fetch_all_rows(&table("orders")).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_all_rows_nonexistent_table() {
        let provider = users_provider().await;
        let error = provider.fetch_all_rows(&table("ghosts")).await.unwrap_err();
        assert!(matches!(error, DatabaseError::Query(_)));
    }

    #[tokio::test]
    async fn test_fetch_all_rows_keeps_declared_column_order() {
        let provider = users_provider().await;
        execute_all(
            &provider.pool,
            &[
                "CREATE TABLE ordering (zulu TEXT, alpha INTEGER, mike REAL)",
                "INSERT INTO ordering VALUES ('z', 1, 2.5)",
            ],
        )
        .await;
        let rows = provider.fetch_all_rows(&table("ordering")).await.unwrap();
        assert_eq!(rows[0].columns().collect::<Vec<_>>(), vec!["zulu", "alpha", "mike"]);
        assert_eq!(
            serde_json::to_string(&rows[0]).unwrap(),
            r#"{"zulu":"z","alpha":1,"mike":2.5}"#
        );
    }

    #[tokio::test]
    async fn test_value_normalization() {
        let provider = users_provider().await;
        execute_all(
            &provider.pool,
            &["CREATE TABLE samples (id INTEGER PRIMARY KEY, payload BLOB, ratio REAL, active BOOLEAN, missing TEXT)"],
        )
        .await;
        sqlx::query("INSERT INTO samples (id, payload, ratio, active, missing) VALUES (?, ?, ?, ?, NULL)")
            .bind(1i64)
            .bind(b"hello".to_vec())
            .bind(0.25f64)
            .bind(true)
            .execute(&provider.pool)
            .await
            .unwrap();

        let rows = provider.fetch_all_rows(&table("samples")).await.unwrap();
        let row = &rows[0];
        assert_eq!(row.get("id"), Some(&ColumnValue::Integer(1)));
        assert_eq!(row.get("payload"), Some(&ColumnValue::Text("hello".into())));
        assert_eq!(row.get("ratio"), Some(&ColumnValue::Float(0.25)));
        assert_eq!(row.get("active"), Some(&ColumnValue::Boolean(true)));
        assert_eq!(row.get("missing"), Some(&ColumnValue::Null));

        let json = serde_json::to_value(row).unwrap();
        assert_eq!(json["payload"], "hello");
    }

    #[tokio::test]
    async fn test_value_normalization_bool_column_and_invalid_utf8_blob() {
        let provider = users_provider().await;
        execute_all(
            &provider.pool,
            &["CREATE TABLE flags (id INTEGER PRIMARY KEY, flag BOOL, raw BLOB)"],
        )
        .await;
        sqlx::query("INSERT INTO flags (id, flag, raw) VALUES (1, 1, ?), (2, 0, ?)")
            .bind(vec![0xffu8, 0x00])
            .bind(b"ok".to_vec())
            .execute(&provider.pool)
            .await
            .unwrap();

        let rows = provider.fetch_all_rows(&table("flags")).await.unwrap();
        assert_eq!(rows[0].get("flag"), Some(&ColumnValue::Boolean(true)));
        assert_eq!(rows[1].get("flag"), Some(&ColumnValue::Boolean(false)));
        assert_eq!(
            rows[0].get("raw"),
            Some(&ColumnValue::Text("\u{fffd}\u{0}".into()))
        );

        let json = serde_json::to_value(&rows[0]).unwrap();
        assert!(json["raw"].is_string());
    }

    #[tokio::test]
    async fn test_fetch_row_by_key() {
        let provider = users_provider().await;
        let users = table("users");
        let row = provider.fetch_row_by_key(&users, "id", "1").await.unwrap();
        assert_eq!(serde_json::to_string(&row).unwrap(), r#"{"id":1,"name":"Ann"}"#);

        let all = provider.fetch_all_rows(&users).await.unwrap();
        assert_eq!(all[0], row);
    }

    #[tokio::test]
    async fn test_fetch_row_by_key_not_found() {
        let provider = users_provider().await;
        let error = provider
            .fetch_row_by_key(&table("users"), "id", "99")
            .await
            .unwrap_err();
        assert!(matches!(error, DatabaseError::RowNotFound { ref value, .. } if value == "99"));
    }

    #[tokio::test]
    async fn test_fetch_row_by_key_binds_value() {
        let provider = users_provider().await;
        let error = provider
            .fetch_row_by_key(&table("users"), "id", "1 OR 1=1")
            .await
            .unwrap_err();
        assert!(matches!(error, DatabaseError::RowNotFound { .. }));
    }

    #[tokio::test]
    async fn test_fetch_row_by_key_returns_first_match() {
        let provider = users_provider().await;
        execute_all(
            &provider.pool,
            &[
                "INSERT INTO orders (order_id, user_id, total) VALUES (7, 1, 10.0)",
                "INSERT INTO orders (order_id, user_id, total) VALUES (8, 1, 20.0)",
            ],
        )
        .await;
        let row = provider
            .fetch_row_by_key(&table("orders"), "user_id", "1")
            .await
            .unwrap();
        assert_eq!(row.get("user_id"), Some(&ColumnValue::Integer(1)));
    }

    #[tokio::test]
    async fn test_connect_rejects_unknown_extension() {
        let config = ServerConfig::new(PathBuf::from("data.txt"));
        let error = connect(&config).await.unwrap_err();
        assert!(matches!(error, crate::Error::UnsupportedExtension(_)));
    }

    #[tokio::test]
    async fn test_connect_does_not_create_missing_file() {
        let path = std::env::temp_dir().join(format!("restique-missing-{}.db", std::process::id()));
        let config = ServerConfig::new(path.clone());
        let error = connect(&config).await.unwrap_err();
        assert!(matches!(error, crate::Error::Database(DatabaseError::Query(_))));
        assert!(!path.exists());
    }
}
