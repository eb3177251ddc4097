//! Aether Studio HTTP backend.
//!
//! Holds every vendor credential server-side and exposes the studio
//! operations to the browser behind a bearer token.

mod auth;
mod config;
mod error;
mod routes;
mod state;

use database::Database;
use studio::Studio;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting studio API");

    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    let studio = Studio::from_env(db.clone())?;
    if config.api_token.is_none() {
        tracing::warn!("STUDIO_API_TOKEN not set; /v1 routes are unauthenticated");
    }

    let app = routes::router(AppState::new(studio, config.api_token));

    info!(addr = %config.addr, "Studio API listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Studio API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
