// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent HTML responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

use crate::services::oauth::AuthError;
use crate::services::spotify::ApiError;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// No usable session; the browser is sent back through `/login`.
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Spotify API error: {0}")]
    SpotifyApi(String),

    /// A user action could not be completed; the message is shown as is.
    #[error("Operation failed: {0}")]
    OperationFailed(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Message shown to the user when an upstream call fails.
    pub const UPSTREAM_FAILURE: &'static str =
        "An error occurred while talking to Spotify. Please try again.";
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        tracing::info!(error = %err, "Session not usable, restarting authorization");
        AppError::Unauthorized
    }
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        AppError::SpotifyApi(err.to_string())
    }
}

impl From<minijinja::Error> for AppError {
    fn from(err: minijinja::Error) -> Self {
        AppError::Template(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Unauthorized => Redirect::to("/login").into_response(),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AppError::SpotifyApi(msg) => {
                tracing::error!(error = %msg, "Spotify API error");
                (StatusCode::BAD_GATEWAY, AppError::UPSTREAM_FAILURE).into_response()
            }
            AppError::OperationFailed(msg) => {
                tracing::warn!(error = %msg, "Operation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg).into_response()
            }
            AppError::Template(msg) => {
                tracing::error!(error = %msg, "Template rendering failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred. Please try again later.",
                )
                    .into_response()
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred. Please try again later.",
                )
                    .into_response()
            }
        }
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
