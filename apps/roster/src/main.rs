mod config;
mod errors;
mod jobs;
mod models;
mod reconcile;
mod routes;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::reconcile::SaveTracker;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::http::BackendClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting roster v{}", env!("CARGO_PKG_VERSION"));

    let backend = BackendClient::new(config.backend_url.clone(), config.backend_timeout)?;
    match config.backend_timeout {
        Some(timeout) => info!(
            "Backend client initialized ({}, timeout {}s)",
            config.backend_url,
            timeout.as_secs()
        ),
        None => info!("Backend client initialized ({})", config.backend_url),
    }

    let state = AppState {
        store: Arc::new(backend),
        saves: SaveTracker::new(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the UI host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
