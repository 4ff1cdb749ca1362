//! Server configuration
//!
//! Built by the command-line layer and validated before the database is opened.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// File extensions accepted for the database file
pub const ALLOWED_EXTENSIONS: &[&str] = &["sqlite", "sqlite3", "db", "db3", "s3db", "sl3"];

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Runtime configuration for serving a database
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Path to an existing SQLite file
    pub database_path: PathBuf,

    /// Address to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Path prefix for all routes (empty serves at the root)
    pub base_path: String,

    /// Upper bound on pooled database connections
    pub max_connections: u32,
}

impl ServerConfig {
    /// Configuration with defaults for everything but the database path
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            base_path: String::new(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// Check the database file extension and pool size
    pub fn validate(&self) -> Result<()> {
        if !has_allowed_extension(&self.database_path) {
            return Err(Error::UnsupportedExtension(
                self.database_path.display().to_string(),
            ));
        }
        if self.max_connections == 0 {
            return Err(Error::InvalidConfig(
                "max_connections must be at least 1".to_string(),
            ));
        }
        if !self.base_path.is_empty() && !self.base_path.starts_with('/') {
            return Err(Error::InvalidConfig(format!(
                "base path must start with '/': {}",
                self.base_path
            )));
        }
        Ok(())
    }

    /// `host:port` string suitable for binding a listener
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn has_allowed_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| ALLOWED_EXTENSIONS.contains(&extension))
}
