// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod session;
pub mod spotify;

pub use session::{Session, SessionId};
pub use spotify::{
    CurrentlyPlaying, PlayHistory, PlaylistCard, SeedTracks, TimeRange, Track, UserProfile,
};
