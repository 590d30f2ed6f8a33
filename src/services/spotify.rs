// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Spotify Web API client.
//!
//! Every call carries the session's bearer token. Status handling:
//! - 2xx with a body: parsed JSON
//! - 204 No Content: `None`
//! - anything else, or no response at all: [`ApiError`]
//!
//! Nothing is retried; callers decide how to degrade.

use chrono::FixedOffset;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::config::Config;
use crate::models::spotify::{
    CreatePlaylistRequest, CreatedPlaylist, Paging, PlayHistory, PlaylistCard, Recommendations,
    SimplifiedPlaylist,
};
use crate::models::{CurrentlyPlaying, SeedTracks, TimeRange, Track, UserProfile};
use crate::services::http::{ApiRequest, ApiResponse, HttpTransport};
use crate::time_utils::format_played_at;

/// Failure of a single Web API call.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    #[error("Spotify request failed: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Spotify returned no content")]
    Empty,

    #[error("JSON parse error: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Play/pause request for the active device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackCommand {
    Pause,
    /// Resume in `context_uri` at `position_ms`; the context offset is always
    /// the first item.
    Resume {
        context_uri: Option<String>,
        position_ms: u64,
    },
}

impl PlaybackCommand {
    pub fn action(&self) -> &'static str {
        match self {
            PlaybackCommand::Pause => "pause",
            PlaybackCommand::Resume { .. } => "play",
        }
    }
}

/// Spotify Web API client.
#[derive(Clone)]
pub struct SpotifyClient {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    display_offset: FixedOffset,
}

impl SpotifyClient {
    pub fn new(config: &Config, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            display_offset: config.display_offset,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    // ─── Reads ───────────────────────────────────────────────────────────────

    /// Profile of the signed-in user.
    pub async fn current_user(&self, access_token: &str) -> Result<UserProfile, ApiError> {
        let request = ApiRequest::get(self.url("me")).bearer_auth(access_token);
        self.get_json(request).await?.ok_or(ApiError::Empty)
    }

    /// What the user is listening to, or `None` when nothing is playing.
    pub async fn currently_playing(
        &self,
        access_token: &str,
    ) -> Result<Option<CurrentlyPlaying>, ApiError> {
        let request =
            ApiRequest::get(self.url("me/player/currently-playing")).bearer_auth(access_token);
        let playing = self.get_json(request).await?;
        if playing.is_none() {
            tracing::info!("No track currently playing");
        }
        Ok(playing)
    }

    /// Recently played tracks, most recent first, with display timestamps.
    pub async fn recently_played(
        &self,
        access_token: &str,
        limit: u32,
    ) -> Result<PlayHistory, ApiError> {
        let request = ApiRequest::get(self.url("me/player/recently-played"))
            .bearer_auth(access_token)
            .query("limit", limit);

        let mut history: PlayHistory = self
            .get_json(request)
            .await?
            .unwrap_or(PlayHistory { items: Vec::new() });

        for item in &mut history.items {
            item.formatted_played_at = format_played_at(&item.played_at, &self.display_offset);
        }
        Ok(history)
    }

    /// The user's top tracks over `range`.
    pub async fn top_tracks(
        &self,
        access_token: &str,
        range: TimeRange,
        limit: u32,
    ) -> Result<Vec<Track>, ApiError> {
        let request = ApiRequest::get(self.url("me/top/tracks"))
            .bearer_auth(access_token)
            .query("time_range", range.as_str())
            .query("limit", limit);

        let page: Option<Paging<Track>> = self.get_json(request).await?;
        Ok(page.map(|p| p.items).unwrap_or_default())
    }

    /// Tracks recommended from `seeds`.
    pub async fn recommendations(
        &self,
        access_token: &str,
        seeds: &SeedTracks,
        limit: u32,
    ) -> Result<Vec<Track>, ApiError> {
        let request = ApiRequest::get(self.url("recommendations"))
            .bearer_auth(access_token)
            .query("seed_tracks", seeds.joined())
            .query("limit", limit);

        let recommendations: Option<Recommendations> = self.get_json(request).await?;
        Ok(recommendations.map(|r| r.tracks).unwrap_or_default())
    }

    /// The user's playlists, reduced to what the dashboard shows.
    pub async fn my_playlists(&self, access_token: &str) -> Result<Vec<PlaylistCard>, ApiError> {
        let request = ApiRequest::get(self.url("me/playlists")).bearer_auth(access_token);

        let page: Option<Paging<Option<SimplifiedPlaylist>>> = self.get_json(request).await?;
        Ok(page
            .map(|p| p.items)
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .map(PlaylistCard::from)
            .collect())
    }

    /// Catalog search; the result shape depends on `kind`.
    pub async fn search(
        &self,
        access_token: &str,
        query: &str,
        kind: &str,
        limit: u32,
    ) -> Result<serde_json::Value, ApiError> {
        let request = ApiRequest::get(self.url("search"))
            .bearer_auth(access_token)
            .query("q", query)
            .query("type", kind)
            .query("limit", limit);

        Ok(self
            .get_json(request)
            .await?
            .unwrap_or(serde_json::Value::Null))
    }

    // ─── Writes (fire and verify) ────────────────────────────────────────────

    /// Create a playlist and return its id. Expects `201 Created`.
    pub async fn create_playlist(
        &self,
        access_token: &str,
        user_id: &str,
        playlist: &CreatePlaylistRequest,
    ) -> Result<String, ApiError> {
        let body = serde_json::to_value(playlist).map_err(|e| ApiError::Decode(e.to_string()))?;
        let request = ApiRequest::post(self.url(&format!(
            "users/{}/playlists",
            urlencoding::encode(user_id)
        )))
        .bearer_auth(access_token)
        .json(body);

        let response = self.expect_status(request, StatusCode::CREATED).await?;
        let created: CreatedPlaylist = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(created.id)
    }

    /// Append tracks to a playlist. Expects `201 Created`.
    pub async fn add_tracks_to_playlist(
        &self,
        access_token: &str,
        playlist_id: &str,
        track_uris: &[String],
    ) -> Result<(), ApiError> {
        let request = ApiRequest::post(self.url(&format!(
            "playlists/{}/tracks",
            urlencoding::encode(playlist_id)
        )))
        .bearer_auth(access_token)
        .json(serde_json::json!({ "uris": track_uris }));

        self.expect_status(request, StatusCode::CREATED).await?;
        Ok(())
    }

    /// Add one track to the playback queue. Expects `204 No Content`.
    pub async fn enqueue_track(&self, access_token: &str, track_uri: &str) -> Result<(), ApiError> {
        let request = ApiRequest::post(self.url("me/player/queue"))
            .bearer_auth(access_token)
            .query("uri", track_uri);

        self.expect_status(request, StatusCode::NO_CONTENT).await?;
        Ok(())
    }

    /// Play or pause. Expects `204 No Content`.
    pub async fn set_playback_state(
        &self,
        access_token: &str,
        command: &PlaybackCommand,
    ) -> Result<(), ApiError> {
        let request = match command {
            PlaybackCommand::Pause => {
                ApiRequest::put(self.url("me/player/pause")).bearer_auth(access_token)
            }
            PlaybackCommand::Resume {
                context_uri,
                position_ms,
            } => {
                let body = match context_uri {
                    Some(uri) => serde_json::json!({
                        "context_uri": uri,
                        "offset": { "position": 0 },
                        "position_ms": position_ms,
                    }),
                    None => serde_json::json!({ "position_ms": position_ms }),
                };
                ApiRequest::put(self.url("me/player/play"))
                    .bearer_auth(access_token)
                    .json(body)
            }
        };

        self.expect_status(request, StatusCode::NO_CONTENT).await?;
        Ok(())
    }

    // ─── Helpers ─────────────────────────────────────────────────────────────

    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let method = request.method.clone();
        let url = request.url.clone();
        self.transport.execute(request).await.map_err(|e| {
            tracing::error!(%method, %url, error = %e, "Spotify request failed");
            ApiError::Transport(e.0)
        })
    }

    /// GET and parse, mapping 204 to `None`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<Option<T>, ApiError> {
        let url = request.url.clone();
        let response = self.send(request).await?;

        if !response.status.is_success() {
            tracing::error!(
                %url,
                status = %response.status,
                body = %response.body,
                "Spotify API returned an error"
            );
            return Err(ApiError::Status {
                status: response.status,
                body: response.body,
            });
        }

        if response.status == StatusCode::NO_CONTENT || response.body.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&response.body)
            .map(Some)
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Send a write and require exactly `expected` back.
    async fn expect_status(
        &self,
        request: ApiRequest,
        expected: StatusCode,
    ) -> Result<ApiResponse, ApiError> {
        let url = request.url.clone();
        let response = self.send(request).await?;

        if response.status != expected {
            tracing::error!(
                %url,
                status = %response.status,
                expected = %expected,
                body = %response.body,
                "Unexpected status from Spotify"
            );
            return Err(ApiError::Status {
                status: response.status,
                body: response.body,
            });
        }

        Ok(response)
    }
}
