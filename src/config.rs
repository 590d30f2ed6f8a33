// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local development.

use chrono::FixedOffset;
use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Spotify OAuth client ID
    pub client_id: String,
    /// Spotify OAuth client secret
    pub client_secret: String,
    /// Callback URL registered with Spotify (must point at `/callback`)
    pub redirect_uri: String,
    /// Base URL of the Web API, without trailing slash
    pub api_base_url: String,
    /// Authorization endpoint of the accounts service
    pub auth_url: String,
    /// Token endpoint of the accounts service
    pub token_url: String,
    /// Offset used when showing play history timestamps
    pub display_offset: FixedOffset,
    /// Server port
    pub port: u16,
}

const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_DISPLAY_OFFSET: &str = "+05:30";

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let display_offset = env::var("DISPLAY_UTC_OFFSET")
            .unwrap_or_else(|_| DEFAULT_DISPLAY_OFFSET.to_string());

        Ok(Self {
            client_id: env::var("CLIENT_ID").map_err(|_| ConfigError::Missing("CLIENT_ID"))?,
            client_secret: env::var("CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("CLIENT_SECRET"))?,
            redirect_uri: env::var("REDIRECT_URI")
                .map_err(|_| ConfigError::Missing("REDIRECT_URI"))?,
            api_base_url: env::var("API_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
            auth_url: env::var("AUTH_URL").unwrap_or_else(|_| DEFAULT_AUTH_URL.to_string()),
            token_url: env::var("TOKEN_URL").unwrap_or_else(|_| DEFAULT_TOKEN_URL.to_string()),
            display_offset: parse_utc_offset(&display_offset)?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .unwrap_or(5000),
        })
    }

    /// Config for tests: points every endpoint at a fake host.
    pub fn test_default() -> Self {
        Self {
            client_id: "test_client_id".to_string(),
            client_secret: "test_secret".to_string(),
            redirect_uri: "http://localhost:5000/callback".to_string(),
            api_base_url: "https://api.test/v1".to_string(),
            auth_url: "https://accounts.test/authorize".to_string(),
            token_url: "https://accounts.test/api/token".to_string(),
            display_offset: FixedOffset::east_opt(5 * 3600 + 30 * 60)
                .expect("offset in range"),
            port: 5000,
        }
    }

    /// Whether cookies should carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.redirect_uri.starts_with("https://")
    }
}

/// Parse an offset such as `+05:30`, `-08:00` or `Z`.
pub fn parse_utc_offset(raw: &str) -> Result<FixedOffset, ConfigError> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or(ConfigError::Invalid("DISPLAY_UTC_OFFSET"));
    }

    let invalid = || ConfigError::Invalid("DISPLAY_UTC_OFFSET");
    let (sign, rest) = match raw.split_at_checked(1) {
        Some(("+", rest)) => (1, rest),
        Some(("-", rest)) => (-1, rest),
        _ => return Err(invalid()),
    };
    let (hours, minutes) = rest.split_once(':').unwrap_or((rest, "0"));
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
