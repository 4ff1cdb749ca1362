//! # restique
//!
//! Expose the tables of a SQLite database as a read-only REST API.
//!
//! ## Routes
//!
//! - `GET /` lists table names
//! - `GET /{table_name}` lists every row of a table
//! - `GET /{table_name}/{primary_key}` fetches one row by primary key
//!
//! Rows are JSON objects whose keys follow the table's column order.
//!
//! ## Security Warning
//!
//! - No authentication/authorization built-in
//! - Exposes full database contents
//! - Table names are restricted to `[A-Za-z0-9_]+` because they are
//!   interpolated into SQL text
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use restique::{config::ServerConfig, database::sqlite, RestiqueLayer};
//!
//! #[tokio::main]
//! async fn main() -> restique::Result<()> {
//!     let config = ServerConfig::new("app.db");
//!     let pool = sqlite::connect(&config).await?;
//!     let app = RestiqueLayer::sqlite(config.base_path.clone(), pool).into_router();
//!
//!     // Serve the application...
//!     # let _ = app;
//!     Ok(())
//! }
//! ```

// Public modules
pub mod api;
pub mod config;
pub mod database;
pub mod identifier;
pub mod layer;
pub mod schema;

// Public exports
pub use config::ServerConfig;
pub use identifier::{is_valid_identifier, TableName};
pub use layer::RestiqueLayer;
pub use schema::{ColumnDescriptor, ColumnValue, Row};

// Re-export database providers
pub use database::sqlite::SqliteProvider;
pub use database::traits::{DatabaseError, DatabaseProvider};

// Error type
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Invalid file extension for database file: {0}")]
    UnsupportedExtension(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
