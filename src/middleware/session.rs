// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session cookie handling and the authentication middleware.

use crate::error::AppError;
use crate::models::session::SESSION_LIFETIME_SECS;
use crate::models::{Session, SessionId};
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;

/// Cookie holding the session id.
pub const SESSION_COOKIE: &str = "sc_session";
/// Cookie holding the OAuth `state` nonce between `/login` and `/callback`.
pub const OAUTH_STATE_COOKIE: &str = "sc_oauth_state";

const OAUTH_STATE_PATH: &str = "/callback";
const OAUTH_STATE_MAX_AGE_MINUTES: i64 = 10;

/// Session attached to a request that passed [`require_session`].
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub id: SessionId,
    pub tokens: Session,
}

impl AuthSession {
    pub fn access_token(&self) -> &str {
        &self.tokens.access_token
    }
}

/// Middleware that requires a session with a usable access token.
///
/// Expired tokens are refreshed here, so the handler always sees a valid
/// one. Anything else sends the browser to `/login`.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let id = session_id(&jar).ok_or(AppError::Unauthorized)?;
    let tokens = state.tokens.ensure_valid(&id).await?;

    request.extensions_mut().insert(AuthSession { id, tokens });
    Ok(next.run(request).await)
}

/// Session id from the request cookies, if any.
pub fn session_id(jar: &CookieJar) -> Option<SessionId> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value())
        .filter(|value| !value.is_empty())
        .map(|value| SessionId::from(value.to_string()))
}

pub fn session_cookie(id: &SessionId, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id.as_str().to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::seconds(SESSION_LIFETIME_SECS))
        .build()
}

pub fn session_cookie_removal(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

pub fn oauth_state_cookie(nonce: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((OAUTH_STATE_COOKIE, nonce.to_string()))
        .path(OAUTH_STATE_PATH)
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::minutes(OAUTH_STATE_MAX_AGE_MINUTES))
        .build()
}

pub fn oauth_state_cookie_removal(secure: bool) -> Cookie<'static> {
    Cookie::build((OAUTH_STATE_COOKIE, ""))
        .path(OAUTH_STATE_PATH)
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let id = SessionId::from("abc".to_string());
        let cookie = session_cookie(&id, false).to_string();

        assert!(cookie.starts_with("sc_session=abc"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Path=/"));
        assert!(!cookie.contains("Secure"));
        assert!(cookie.contains("Max-Age=2592000"));
    }

    #[test]
    fn test_oauth_state_cookie_is_scoped_to_callback() {
        let cookie = oauth_state_cookie("nonce", true).to_string();

        assert!(cookie.contains("Path=/callback"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("Max-Age=600"));
    }
}
