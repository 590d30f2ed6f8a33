// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Spotify Web API payloads.
//!
//! Only the fields this app reads or renders are modeled; everything else in
//! the upstream JSON is ignored.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistRef {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumRef {
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
}

/// Full or simplified track object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// `None` for local files.
    pub id: Option<String>,
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    pub album: Option<AlbumRef>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackContext {
    pub uri: String,
}

/// Response of `GET /me/player/currently-playing`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentlyPlaying {
    pub is_playing: bool,
    pub progress_ms: Option<u64>,
    pub item: Option<Track>,
    pub context: Option<PlaybackContext>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayHistoryItem {
    pub track: Track,
    /// RFC3339 UTC timestamp as sent upstream.
    pub played_at: String,
    /// `played_at` rendered in the display offset.
    #[serde(default)]
    pub formatted_played_at: Option<String>,
}

/// Response of `GET /me/player/recently-played`, most recent first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayHistory {
    pub items: Vec<PlayHistoryItem>,
}

/// Generic `{ "items": [...] }` page.
#[derive(Debug, Clone, Deserialize)]
pub struct Paging<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Recommendations {
    pub tracks: Vec<Track>,
}

/// Response of `GET /me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub country: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimplifiedPlaylist {
    pub name: Option<String>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    pub images: Option<Vec<Image>>,
}

/// What the dashboard shows for each playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaylistCard {
    pub name: String,
    pub link: String,
    pub image: Option<String>,
}

impl From<SimplifiedPlaylist> for PlaylistCard {
    fn from(playlist: SimplifiedPlaylist) -> Self {
        Self {
            name: playlist
                .name
                .unwrap_or_else(|| "Unknown Playlist".to_string()),
            link: playlist
                .external_urls
                .spotify
                .unwrap_or_else(|| "#".to_string()),
            image: playlist
                .images
                .and_then(|images| images.into_iter().next())
                .map(|image| image.url),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedPlaylist {
    pub id: String,
}

/// Lookback window for top items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeRange {
    /// Roughly the last four weeks.
    #[default]
    ShortTerm,
    MediumTerm,
    LongTerm,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::ShortTerm => "short_term",
            TimeRange::MediumTerm => "medium_term",
            TimeRange::LongTerm => "long_term",
        }
    }
}

/// Maximum number of seeds the recommendations endpoint accepts.
pub const MAX_SEED_TRACKS: usize = 5;

/// Seed track ids for a recommendations query, capped at [`MAX_SEED_TRACKS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedTracks(Vec<String>);

impl SeedTracks {
    /// Keep the first [`MAX_SEED_TRACKS`] ids, dropping the rest.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(ids.into_iter().take(MAX_SEED_TRACKS).map(Into::into).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Comma-separated form used in the `seed_tracks` query parameter.
    pub fn joined(&self) -> String {
        self.0.join(",")
    }
}
