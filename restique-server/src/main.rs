//! Binary entrypoint for serving a SQLite file as a REST API.

use anyhow::{Context, Result};
use clap::Parser;
use restique::database::sqlite;
use restique::{RestiqueLayer, ServerConfig};
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("restique=info,tower_http=info,warn")),
        )
        .init();

    let config = ServerConfig::from(cli::Args::parse());
    let pool = sqlite::connect(&config).await.with_context(|| {
        format!(
            "Failed to initialize database {}",
            config.database_path.display()
        )
    })?;

    let app = RestiqueLayer::sqlite(config.base_path.clone(), pool.clone()).into_router();

    let address = config.listen_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind to {}", address))?;

    tracing::info!("Starting server on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool.close().await;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", error);
        std::future::pending::<()>().await;
    }
}
