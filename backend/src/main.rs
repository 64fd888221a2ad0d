//! Main entry point for the to-do backend.
//!
//! This file initializes logging, loads configuration, opens the database,
//! and serves the Axum router until the process receives Ctrl-C.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todo_backend::config::Config;
use todo_backend::database::Database;
use todo_backend::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(?config, "starting");

    let db = Database::connect(&config.database_url)
        .await
        .with_context(|| format!("failed to open database {}", config.database_url))?;
    let state = AppState::new(&config, db).context("failed to initialize authentication")?;

    let listener = TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address))?;
    tracing::info!("listening on {}", config.bind_address);

    axum::serve(listener, todo_backend::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
}
