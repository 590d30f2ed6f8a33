// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User-facing actions composed from several Web API calls.
//!
//! Empty intermediate results are outcomes, not errors: each operation
//! reports them through its outcome enum and the route picks the response.
//! `Err` is reserved for upstream failures that stop the operation.

use crate::models::spotify::CreatePlaylistRequest;
use crate::models::{SeedTracks, TimeRange, Track};
use crate::services::spotify::{ApiError, PlaybackCommand, SpotifyClient};

pub const RECOMMENDED_PLAYLIST_NAME: &str = "Recommended Playlist Based on Your Top Songs";
pub const RECOMMENDED_PLAYLIST_DESCRIPTION: &str =
    "Playlist based on your top songs in the last 30 days";

const TOP_TRACKS_LIMIT: u32 = 10;
const PLAYLIST_RECOMMENDATIONS_LIMIT: u32 = 10;
const QUEUE_RECOMMENDATIONS_LIMIT: u32 = 5;
const HISTORY_LIMIT: u32 = 10;

// ─── Recommend playlist ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaylistOutcome {
    Created {
        playlist_id: String,
        track_count: usize,
        /// `false` if the playlist exists but the tracks could not be added.
        tracks_added: bool,
    },
    NoTopTracks,
    NoRecommendations,
    CreationFailed,
}

/// Build a private playlist from recommendations seeded by the user's
/// short-term top tracks.
pub async fn recommend_playlist(
    spotify: &SpotifyClient,
    access_token: &str,
) -> Result<PlaylistOutcome, ApiError> {
    let user = spotify.current_user(access_token).await?;

    let top_tracks = spotify
        .top_tracks(access_token, TimeRange::ShortTerm, TOP_TRACKS_LIMIT)
        .await?;
    let seeds = SeedTracks::from_ids(track_ids(&top_tracks));
    if seeds.is_empty() {
        tracing::info!(user_id = %user.id, "No top tracks to seed recommendations");
        return Ok(PlaylistOutcome::NoTopTracks);
    }

    let recommended = spotify
        .recommendations(access_token, &seeds, PLAYLIST_RECOMMENDATIONS_LIMIT)
        .await?;
    if recommended.is_empty() {
        tracing::info!(seeds = seeds.len(), "No recommendations returned");
        return Ok(PlaylistOutcome::NoRecommendations);
    }

    let request = CreatePlaylistRequest {
        name: RECOMMENDED_PLAYLIST_NAME.to_string(),
        description: RECOMMENDED_PLAYLIST_DESCRIPTION.to_string(),
        public: false,
    };
    let playlist_id = match spotify
        .create_playlist(access_token, &user.id, &request)
        .await
    {
        Ok(id) => id,
        Err(e) => {
            tracing::error!(user_id = %user.id, error = %e, "Error creating playlist");
            return Ok(PlaylistOutcome::CreationFailed);
        }
    };

    let track_uris: Vec<String> = recommended.iter().map(|t| t.uri.clone()).collect();
    let tracks_added = match spotify
        .add_tracks_to_playlist(access_token, &playlist_id, &track_uris)
        .await
    {
        Ok(()) => {
            tracing::info!(%playlist_id, count = track_uris.len(), "Tracks added to playlist");
            true
        }
        Err(e) => {
            tracing::error!(%playlist_id, error = %e, "Error adding tracks to playlist");
            false
        }
    };

    Ok(PlaylistOutcome::Created {
        playlist_id,
        track_count: track_uris.len(),
        tracks_added,
    })
}

// ─── Queue related tracks ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueOutcome {
    Queued { attempted: usize, succeeded: usize },
    /// Nothing playing and no play history.
    NoSeed,
    NoRecommendations,
}

/// Queue tracks related to what is playing now, or else to the most
/// recently played track.
///
/// Every recommendation gets an enqueue attempt; failures are logged one by
/// one and do not stop the rest.
pub async fn queue_related_tracks(
    spotify: &SpotifyClient,
    access_token: &str,
) -> Result<QueueOutcome, ApiError> {
    let Some(seed) = pick_seed_track(spotify, access_token).await? else {
        tracing::info!("No current or recent track to seed recommendations");
        return Ok(QueueOutcome::NoSeed);
    };

    let seeds = SeedTracks::from_ids([seed]);
    let recommended = spotify
        .recommendations(access_token, &seeds, QUEUE_RECOMMENDATIONS_LIMIT)
        .await?;
    if recommended.is_empty() {
        tracing::info!("No recommended tracks found");
        return Ok(QueueOutcome::NoRecommendations);
    }

    let mut succeeded = 0;
    for track in &recommended {
        match spotify.enqueue_track(access_token, &track.uri).await {
            Ok(()) => {
                tracing::info!(track_uri = %track.uri, "Added track to queue");
                succeeded += 1;
            }
            Err(e) => {
                tracing::warn!(track_uri = %track.uri, error = %e, "Failed to add track to queue");
            }
        }
    }

    Ok(QueueOutcome::Queued {
        attempted: recommended.len(),
        succeeded,
    })
}

/// Currently playing track id, falling back to the latest history entry.
///
/// A failing currently-playing lookup falls through to history; a failing
/// history lookup after that is returned as an error.
async fn pick_seed_track(
    spotify: &SpotifyClient,
    access_token: &str,
) -> Result<Option<String>, ApiError> {
    match spotify.currently_playing(access_token).await {
        Ok(Some(playing)) => {
            if let Some(id) = playing.item.and_then(|track| track.id) {
                return Ok(Some(id));
            }
        }
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(error = %e, "Could not read current track, using history");
        }
    }

    let history = spotify.recently_played(access_token, HISTORY_LIMIT).await?;
    Ok(history
        .items
        .into_iter()
        .find_map(|item| item.track.id))
}

// ─── Toggle playback ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Paused,
    Resumed,
    NothingPlaying,
    /// Spotify rejected the play/pause request.
    Failed { action: &'static str },
}

/// Pause if playing, otherwise resume where the player stands.
pub async fn toggle_playback(
    spotify: &SpotifyClient,
    access_token: &str,
) -> Result<ToggleOutcome, ApiError> {
    let Some(playing) = spotify.currently_playing(access_token).await? else {
        return Ok(ToggleOutcome::NothingPlaying);
    };

    let command = playback_command_for(&playing);
    let action = command.action();

    match spotify.set_playback_state(access_token, &command).await {
        Ok(()) => {
            tracing::info!(action, "Playback action successful");
            Ok(match command {
                PlaybackCommand::Pause => ToggleOutcome::Paused,
                PlaybackCommand::Resume { .. } => ToggleOutcome::Resumed,
            })
        }
        Err(e) => {
            tracing::warn!(action, error = %e, "Playback action failed");
            Ok(ToggleOutcome::Failed { action })
        }
    }
}

/// The command that flips the current playback state.
pub fn playback_command_for(playing: &crate::models::CurrentlyPlaying) -> PlaybackCommand {
    if playing.is_playing {
        PlaybackCommand::Pause
    } else {
        PlaybackCommand::Resume {
            context_uri: playing.context.as_ref().map(|c| c.uri.clone()),
            position_ms: playing.progress_ms.unwrap_or(0),
        }
    }
}

fn track_ids(tracks: &[Track]) -> impl Iterator<Item = String> + '_ {
    tracks.iter().filter_map(|t| t.id.clone())
}
