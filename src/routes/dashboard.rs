// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Read-only pages for signed-in users.

use axum::{
    extract::{Query, State},
    response::Html,
    routing::get,
    Extension, Router,
};
use minijinja::context;
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::AuthSession;
use crate::AppState;

const RECENT_TRACKS_LIMIT: u32 = 10;
const SEARCH_LIMIT: u32 = 10;

/// Dashboard routes (session required; see routes/mod.rs).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/playlists", get(get_playlists))
        .route("/search", get(search))
}

// ─── Dashboard ───────────────────────────────────────────────

/// Profile, playback, history and playlists on one page.
///
/// The profile and playlist calls are required; now-playing and history
/// degrade to empty sections when they fail.
async fn get_playlists(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthSession>,
) -> Result<Html<String>> {
    let token = session.access_token();

    let user = state.spotify.current_user(token).await?;

    let current_track = state
        .spotify
        .currently_playing(token)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Error fetching currently playing track");
            None
        });
    tracing::debug!(playing = current_track.is_some(), "Current track");

    let recent_tracks = match state
        .spotify
        .recently_played(token, RECENT_TRACKS_LIMIT)
        .await
    {
        Ok(history) => Some(history),
        Err(e) => {
            tracing::warn!(error = %e, "Error fetching recently played tracks");
            None
        }
    };
    tracing::debug!(
        count = recent_tracks.as_ref().map(|h| h.items.len()).unwrap_or(0),
        "Recent tracks"
    );

    let playlists = state.spotify.my_playlists(token).await?;

    state.views.render(
        "playlists.html",
        context! {
            user => user,
            current_track => current_track,
            recent_tracks => recent_tracks,
            playlists => playlists,
        },
    )
}

// ─── Search ──────────────────────────────────────────────────

#[derive(Deserialize)]
struct SearchParams {
    query: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

async fn search(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthSession>,
    Query(params): Query<SearchParams>,
) -> Result<Html<String>> {
    let non_empty = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    let (Some(query), Some(kind)) = (non_empty(params.query), non_empty(params.kind)) else {
        return Err(AppError::BadRequest(
            "Please provide a search query and type.".to_string(),
        ));
    };

    let results = state
        .spotify
        .search(session.access_token(), &query, &kind, SEARCH_LIMIT)
        .await?;

    // One section per requested type; `type` may list several.
    let mut results = match results {
        serde_json::Value::Object(sections) => sections,
        _ => serde_json::Map::new(),
    };
    results.retain(|_, section| {
        section["items"]
            .as_array()
            .is_some_and(|items| !items.is_empty())
    });

    state.views.render(
        "search_results.html",
        context! {
            results => results,
            search_type => kind,
            query => query,
        },
    )
}
