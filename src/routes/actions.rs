// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! State-changing actions. Each one redirects back to the dashboard on
//! success and answers with a short message otherwise.

use axum::{extract::State, response::Redirect, routing::post, Extension, Router};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::AuthSession;
use crate::services::features::{self, PlaylistOutcome, QueueOutcome, ToggleOutcome};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/playback", post(control_playback))
        .route("/recommend_playlist", post(recommend_playlist))
        .route("/queue_related", post(queue_related_tracks))
}

fn back_to_dashboard() -> Redirect {
    Redirect::to("/playlists")
}

async fn control_playback(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthSession>,
) -> Result<Redirect> {
    match features::toggle_playback(&state.spotify, session.access_token()).await? {
        ToggleOutcome::Paused | ToggleOutcome::Resumed => Ok(back_to_dashboard()),
        ToggleOutcome::NothingPlaying => Err(AppError::BadRequest(
            "No track is currently playing.".to_string(),
        )),
        ToggleOutcome::Failed { action } => {
            let verb = if action == "pause" { "pause" } else { "resume" };
            Err(AppError::OperationFailed(format!(
                "Could not {} playback.",
                verb
            )))
        }
    }
}

async fn recommend_playlist(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthSession>,
) -> Result<Redirect> {
    match features::recommend_playlist(&state.spotify, session.access_token()).await? {
        PlaylistOutcome::Created {
            playlist_id,
            track_count,
            tracks_added,
        } => {
            tracing::info!(%playlist_id, track_count, tracks_added, "Recommended playlist created");
            Ok(back_to_dashboard())
        }
        PlaylistOutcome::NoTopTracks => {
            Err(AppError::BadRequest("No top tracks found.".to_string()))
        }
        PlaylistOutcome::NoRecommendations => {
            Err(AppError::BadRequest("No similar tracks found.".to_string()))
        }
        PlaylistOutcome::CreationFailed => Err(AppError::OperationFailed(
            "Failed to create playlist.".to_string(),
        )),
    }
}

async fn queue_related_tracks(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthSession>,
) -> Result<Redirect> {
    match features::queue_related_tracks(&state.spotify, session.access_token()).await? {
        QueueOutcome::Queued {
            attempted,
            succeeded,
        } => {
            tracing::info!(attempted, succeeded, "Related tracks queued");
            Ok(back_to_dashboard())
        }
        QueueOutcome::NoSeed => Err(AppError::BadRequest(
            "Could not retrieve recently played tracks".to_string(),
        )),
        QueueOutcome::NoRecommendations => Err(AppError::BadRequest(
            "Could not fetch recommended tracks".to_string(),
        )),
    }
}
