// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Security headers middleware.

use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use reqwest::Url;
use std::sync::Arc;

/// Content-Security-Policy for the server-rendered pages.
///
/// Pages use an inline stylesheet and Spotify-hosted cover art. Forms may
/// submit to this origin and follow its redirect to the authorization server.
pub fn content_security_policy(auth_url: &str) -> String {
    let mut form_action = String::from("'self'");
    match Url::parse(auth_url) {
        Ok(url) if url.has_host() => {
            form_action.push(' ');
            form_action.push_str(&url.origin().ascii_serialization());
        }
        _ => tracing::warn!(auth_url, "Authorization URL has no origin, not allowed in form-action"),
    }

    format!(
        "default-src 'none'; img-src https: data:; style-src 'unsafe-inline'; form-action {}; frame-ancestors 'none'",
        form_action
    )
}

/// Headers shared by every response.
#[derive(Clone)]
pub struct SecurityHeaders {
    csp: HeaderValue,
}

impl SecurityHeaders {
    pub fn new(auth_url: &str) -> anyhow::Result<Self> {
        Ok(Self {
            csp: HeaderValue::from_str(&content_security_policy(auth_url))?,
        })
    }
}

/// Add security headers to all responses.
pub async fn add_security_headers(
    State(security): State<Arc<SecurityHeaders>>,
    req: Request,
    next: Next,
) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert("Content-Security-Policy", security.csp.clone());
    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("no-referrer"),
    );

    response
}
