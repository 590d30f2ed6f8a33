// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Spotify companion: a small web app on top of the Spotify Web API.
//!
//! Users sign in with the OAuth authorization-code flow and can then browse
//! their playlists and listening history, toggle playback, queue related
//! tracks and generate a recommended playlist.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;
pub mod views;

use config::Config;
use middleware::security::SecurityHeaders;
use services::{Clock, HttpTransport, SpotifyClient, TokenManager, TokenStore};
use std::sync::Arc;
use views::Views;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub tokens: TokenManager,
    pub spotify: SpotifyClient,
    pub views: Views,
    pub security: Arc<SecurityHeaders>,
}

impl AppState {
    /// Wire the services around the given transport, store and clock.
    pub fn new(
        config: Config,
        transport: Arc<dyn HttpTransport>,
        store: Arc<dyn TokenStore>,
        clock: Arc<dyn Clock>,
    ) -> anyhow::Result<Self> {
        let tokens = TokenManager::new(&config, transport.clone(), store, clock);
        let spotify = SpotifyClient::new(&config, transport);
        let views = Views::new()?;
        let security = Arc::new(SecurityHeaders::new(&config.auth_url)?);

        Ok(Self {
            config,
            tokens,
            spotify,
            views,
            security,
        })
    }
}
