// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Spotify OAuth authentication routes.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use std::sync::Arc;
use subtle::ConstantTimeEq;

use crate::error::{AppError, Result};
use crate::middleware::session::{
    oauth_state_cookie, oauth_state_cookie_removal, session_cookie, session_cookie_removal,
    session_id, OAUTH_STATE_COOKIE,
};
use crate::models::session::random_token;
use crate::models::SessionId;
use crate::services::TokenState;
use crate::AppState;

const OAUTH_STATE_BYTES: usize = 16;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", get(login))
        .route("/callback", get(callback))
        .route("/refresh_token", get(refresh_token))
        .route("/logout", get(logout))
}

/// Start OAuth flow - redirect to Spotify authorization.
async fn login(State(state): State<Arc<AppState>>, jar: CookieJar) -> Result<(CookieJar, Redirect)> {
    let nonce = random_token(OAUTH_STATE_BYTES)?;
    let auth_url = state.tokens.authorization_url(&nonce);

    tracing::info!(
        client_id = %state.config.client_id,
        "Starting OAuth flow, redirecting to Spotify"
    );

    let jar = jar.add(oauth_state_cookie(&nonce, state.config.secure_cookies()));
    Ok((jar, Redirect::to(&auth_url)))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth callback - exchange code for tokens, create session.
async fn callback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<Response> {
    let secure = state.config.secure_cookies();
    let expected_state = jar
        .get(OAUTH_STATE_COOKIE)
        .map(|c| c.value().to_string());
    let jar = jar.remove(oauth_state_cookie_removal(secure));

    if let Some(error) = params.error {
        tracing::warn!(error = %error, "OAuth error from Spotify");
        return Ok((jar, AppError::BadRequest(format!("Error: {}", error))).into_response());
    }

    if !state_matches(expected_state.as_deref(), params.state.as_deref()) {
        tracing::error!("OAuth state mismatch! Potential tampering.");
        return Err(AppError::BadRequest("Error: Invalid OAuth state.".to_string()));
    }

    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::BadRequest("Error: Missing authorization code.".to_string()))?;

    tracing::info!("Exchanging authorization code for tokens");

    // A browser signing in again replaces its previous session.
    if let Some(previous) = session_id(&jar) {
        state.tokens.sign_out(&previous).await?;
        tracing::info!(session = %previous, "Replacing previous session");
    }

    let id = SessionId::generate()?;
    match state.tokens.complete_authorization(&id, &code).await {
        Ok(_) => {
            let jar = jar.add(session_cookie(&id, secure));
            Ok((jar, Redirect::to("/playlists")).into_response())
        }
        Err(e) => {
            tracing::error!(error = %e, "Error in callback");
            Ok((
                jar,
                (
                    StatusCode::BAD_GATEWAY,
                    "Error: Unable to get token. Please try again.",
                ),
            )
                .into_response())
        }
    }
}

/// Constant-time comparison of the returned `state` with the cookie copy.
fn state_matches(expected: Option<&str>, received: Option<&str>) -> bool {
    match (expected, received) {
        (Some(expected), Some(received)) if !expected.is_empty() => {
            expected.as_bytes().ct_eq(received.as_bytes()).into()
        }
        _ => false,
    }
}

/// Explicit refresh: renew an expired token, then go back to the dashboard.
async fn refresh_token(State(state): State<Arc<AppState>>, jar: CookieJar) -> Result<Redirect> {
    let id = session_id(&jar).ok_or(AppError::Unauthorized)?;

    match state.tokens.state(&id).await? {
        TokenState::Unauthenticated => Err(AppError::Unauthorized),
        TokenState::Authenticated(session) if session.refresh_token.is_none() => {
            Err(AppError::Unauthorized)
        }
        TokenState::Authenticated(_) => Ok(Redirect::to("/playlists")),
        TokenState::Expired(session) => {
            state.tokens.refresh(&id, &session).await?;
            Ok(Redirect::to("/playlists"))
        }
    }
}

/// Logout - forget the session and clear the cookie.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> Result<(CookieJar, Redirect)> {
    if let Some(id) = session_id(&jar) {
        state.tokens.sign_out(&id).await?;
        tracing::info!(session = %id, "Session signed out");
    }

    let jar = jar.remove(session_cookie_removal(state.config.secure_cookies()));
    Ok((jar, Redirect::to("/")))
}
