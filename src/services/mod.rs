// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod features;
pub mod http;
pub mod oauth;
pub mod session_store;
pub mod spotify;

pub use http::{HttpTransport, ReqwestTransport};
pub use oauth::{AuthError, Clock, SystemClock, TokenManager, TokenState};
pub use session_store::{InMemoryTokenStore, TokenStore};
pub use spotify::{ApiError, SpotifyClient};
