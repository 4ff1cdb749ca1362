//! Command-line arguments

use clap::Parser;
use restique::config::{DEFAULT_HOST, DEFAULT_MAX_CONNECTIONS, DEFAULT_PORT};
use restique::ServerConfig;
use std::path::PathBuf;

/// A REST API server for SQLite databases
#[derive(Parser, Debug, Clone)]
#[command(
    name = "restique",
    version,
    about = "A REST API server for SQLite databases",
    long_about = "restique serves the tables of an existing SQLite database as read-only JSON resources."
)]
pub struct Args {
    /// SQLite database file (.sqlite, .sqlite3, .db, .db3, .s3db or .sl3)
    #[arg(value_name = "DATABASE")]
    pub database: PathBuf,

    /// Port on which the server will run
    #[arg(short, long, env = "RESTIQUE_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Address to bind to
    #[arg(long, env = "RESTIQUE_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// URL prefix for all routes, e.g. /api
    #[arg(long, env = "RESTIQUE_BASE_PATH", default_value = "")]
    pub base_path: String,

    /// Maximum number of pooled database connections
    #[arg(long, default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        ServerConfig {
            database_path: args.database,
            host: args.host,
            port: args.port,
            base_path: args.base_path,
            max_connections: args.max_connections,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["restique", "app.db"]).unwrap();
        let config = ServerConfig::from(args);
        assert_eq!(config.database_path, PathBuf::from("app.db"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
        assert!(config.base_path.is_empty());
        assert_eq!(config.max_connections, 5);
    }

    #[test]
    fn test_short_port_flag() {
        let args = Args::try_parse_from(["restique", "-p", "3000", "app.sqlite"]).unwrap();
        assert_eq!(args.port, 3000);
    }

    #[test]
    fn test_requires_database() {
        assert!(Args::try_parse_from(["restique"]).is_err());
    }

    #[test]
    fn test_command_is_well_formed() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
