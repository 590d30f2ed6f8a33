// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Spotify companion web server
//!
//! Signs users in with Spotify and serves the dashboard and playback actions.

use spotify_companion::{
    config::Config,
    services::{InMemoryTokenStore, ReqwestTransport, SystemClock},
    AppState,
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Spotify companion");

    let transport = Arc::new(ReqwestTransport::new());
    let store = Arc::new(InMemoryTokenStore::new());
    tracing::info!("In-memory session store initialized");

    let state = Arc::new(AppState::new(
        config.clone(),
        transport,
        store,
        Arc::new(SystemClock),
    )?);

    spawn_session_sweeper(state.clone());

    // Build router
    let app = spotify_companion::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Periodically drop sessions past their lifetime.
fn spawn_session_sweeper(state: Arc<AppState>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            if let Err(e) = state.tokens.purge_stale_sessions().await {
                tracing::warn!(error = %e, "Session sweep failed");
            }
        }
    });
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("spotify_companion=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
