// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth token lifecycle for browser sessions.
//!
//! A session moves between three states:
//!
//! ```text
//! Unauthenticated --code exchange--> Authenticated --expiry--> Expired
//!        ^                                  ^                     |
//!        |                                  +------refresh--------+
//!        +-------------refresh failed / no refresh token----------+
//! ```
//!
//! [`TokenState::classify`] derives the current state from the stored
//! session and the clock; [`TokenManager`] performs the transitions.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;

use crate::config::Config;
use crate::models::{Session, SessionId};
use crate::services::http::{ApiRequest, HttpTransport};
use crate::services::session_store::{StoreError, TokenStore};

/// Scopes requested at login.
pub const SCOPES: &[&str] = &[
    "user-read-private",
    "user-read-email",
    "user-read-currently-playing",
    "user-read-playback-state",
    "user-modify-playback-state",
    "user-read-recently-played",
    "user-top-read",
    "playlist-modify-private",
    "user-read-playback-position",
];

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Where a session stands with respect to its tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenState {
    Unauthenticated,
    Authenticated(Session),
    Expired(Session),
}

impl TokenState {
    pub fn classify(session: Option<Session>, now: DateTime<Utc>) -> Self {
        match session {
            None => TokenState::Unauthenticated,
            Some(session) if session.is_expired(now) => TokenState::Expired(session),
            Some(session) => TokenState::Authenticated(session),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("No authenticated session")]
    NotAuthenticated,

    #[error("Access token expired and no refresh token is available")]
    MissingRefreshToken,

    #[error("Authorization code exchange failed: {0}")]
    Exchange(String),

    #[error("Token refresh failed: {0}")]
    Refresh(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Token endpoint response for both grant types.
#[derive(Debug, Clone, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    expires_in: i64,
}

/// Drives the authorization-code flow and keeps session tokens fresh.
pub struct TokenManager {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    auth_url: String,
    token_url: String,
    transport: Arc<dyn HttpTransport>,
    store: Arc<dyn TokenStore>,
    clock: Arc<dyn Clock>,
}

impl TokenManager {
    pub fn new(
        config: &Config,
        transport: Arc<dyn HttpTransport>,
        store: Arc<dyn TokenStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            auth_url: config.auth_url.clone(),
            token_url: config.token_url.clone(),
            transport,
            store,
            clock,
        }
    }

    /// Authorization URL the browser is redirected to. Touches no state.
    pub fn authorization_url(&self, oauth_state: &str) -> String {
        format!(
            "{}?client_id={}&response_type=code&scope={}&redirect_uri={}&show_dialog=true&state={}",
            self.auth_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&SCOPES.join(" ")),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(oauth_state),
        )
    }

    /// Current state of the session `id`.
    ///
    /// A session past its lifetime is deleted and reads as unauthenticated.
    pub async fn state(&self, id: &SessionId) -> Result<TokenState, AuthError> {
        let now = self.clock.now();
        let session = match self.store.get(id).await? {
            Some(session) if session.is_stale(now) => {
                tracing::info!(session = %id, "Session lifetime over, signing out");
                self.store.delete(id).await?;
                None
            }
            session => session,
        };
        Ok(TokenState::classify(session, now))
    }

    /// Exchange an authorization code and store the resulting session.
    ///
    /// On failure nothing is stored and the session stays unauthenticated.
    pub async fn complete_authorization(
        &self,
        id: &SessionId,
        code: &str,
    ) -> Result<Session, AuthError> {
        let request = ApiRequest::post(&self.token_url).form(&[
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ]);

        let tokens = self
            .request_tokens(request)
            .await
            .map_err(AuthError::Exchange)?;

        let expires_in = tokens.expires_in;
        let session = Session::from_grant(
            tokens.access_token,
            tokens.refresh_token,
            expires_in,
            self.clock.now(),
        )
        .ok_or_else(|| AuthError::Exchange(format!("invalid expires_in: {}", expires_in)))?;
        self.store.put(id, session.clone()).await?;

        tracing::info!(session = %id, expires_at = session.expires_at, "Session authenticated");
        Ok(session)
    }

    /// Return a session whose access token is usable right now.
    ///
    /// Refreshes only when the stored token has expired.
    pub async fn ensure_valid(&self, id: &SessionId) -> Result<Session, AuthError> {
        match self.state(id).await? {
            TokenState::Authenticated(session) => Ok(session),
            TokenState::Expired(session) => {
                tracing::info!(session = %id, "Access token expired, refreshing");
                self.refresh(id, &session).await
            }
            TokenState::Unauthenticated => Err(AuthError::NotAuthenticated),
        }
    }

    /// Trade the refresh token for a new access token.
    ///
    /// The refresh token is kept as is. Any failure drops the session.
    pub async fn refresh(&self, id: &SessionId, session: &Session) -> Result<Session, AuthError> {
        let Some(refresh_token) = session.refresh_token.as_deref() else {
            self.store.delete(id).await?;
            return Err(AuthError::MissingRefreshToken);
        };

        let request = ApiRequest::post(&self.token_url).form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ]);

        let refreshed = self.request_tokens(request).await.and_then(|tokens| {
            let expires_in = tokens.expires_in;
            session
                .refreshed(tokens.access_token, expires_in, self.clock.now())
                .ok_or_else(|| format!("invalid expires_in: {}", expires_in))
        });

        match refreshed {
            Ok(refreshed) => {
                self.store.put(id, refreshed.clone()).await?;
                tracing::info!(session = %id, expires_at = refreshed.expires_at, "Token refreshed");
                Ok(refreshed)
            }
            Err(msg) => {
                tracing::warn!(session = %id, error = %msg, "Token refresh failed, dropping session");
                self.store.delete(id).await?;
                Err(AuthError::Refresh(msg))
            }
        }
    }

    /// Drop every stored session past its lifetime.
    pub async fn purge_stale_sessions(&self) -> Result<usize, AuthError> {
        let purged = self.store.purge_stale(self.clock.now()).await?;
        if purged > 0 {
            tracing::info!(purged, "Purged stale sessions");
        }
        Ok(purged)
    }

    /// Forget the session entirely.
    pub async fn sign_out(&self, id: &SessionId) -> Result<(), AuthError> {
        self.store.delete(id).await?;
        Ok(())
    }

    async fn request_tokens(&self, request: ApiRequest) -> Result<TokenResponse, String> {
        let response = self
            .transport
            .execute(request)
            .await
            .map_err(|e| e.to_string())?;

        if !response.status.is_success() {
            tracing::error!(
                status = %response.status,
                body = %response.body,
                "Token endpoint rejected request"
            );
            return Err(format!("HTTP {}", response.status));
        }

        serde_json::from_str(&response.body)
            .map_err(|e| format!("Failed to parse token response: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(expires_at: i64) -> Session {
        Session {
            access_token: "a".to_string(),
            refresh_token: Some("r".to_string()),
            expires_at,
            created_at: 900,
        }
    }

    #[test]
    fn test_classify_states() {
        let now = DateTime::from_timestamp(1_000, 0).unwrap();

        assert_eq!(TokenState::classify(None, now), TokenState::Unauthenticated);
        assert_eq!(
            TokenState::classify(Some(session(1_001)), now),
            TokenState::Authenticated(session(1_001))
        );
        assert_eq!(
            TokenState::classify(Some(session(1_000)), now),
            TokenState::Expired(session(1_000))
        );
        assert_eq!(
            TokenState::classify(Some(session(1_001)), now + Duration::seconds(5)),
            TokenState::Expired(session(1_001))
        );
    }

    #[test]
    fn test_scopes_cover_playback_and_playlists() {
        assert!(SCOPES.contains(&"user-modify-playback-state"));
        assert!(SCOPES.contains(&"playlist-modify-private"));
        assert_eq!(SCOPES.len(), 9);
    }
}
