// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Browser session and the OAuth tokens it holds.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use std::fmt;

const SESSION_ID_BYTES: usize = 32;

/// Opaque identifier stored in the session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh random session id.
    pub fn generate() -> anyhow::Result<Self> {
        Ok(Self(random_token(SESSION_ID_BYTES)?))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Prefix only.
        let prefix: String = self.0.chars().take(6).collect();
        write!(f, "{}…", prefix)
    }
}

/// Random URL-safe token of `len` bytes of entropy.
pub fn random_token(len: usize) -> anyhow::Result<String> {
    let mut bytes = vec![0u8; len];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| anyhow::anyhow!("System RNG unavailable"))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// How long a browser session lives after sign-in, refreshes included.
pub const SESSION_LIFETIME_SECS: i64 = 30 * 24 * 60 * 60;

/// OAuth tokens held for one browser session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Absolute expiry (Unix seconds).
    pub expires_at: i64,
    /// Sign-in time (Unix seconds); bounds the session lifetime.
    pub created_at: i64,
}

impl Session {
    /// Build a session from a token response received at `now`.
    ///
    /// `None` if `expires_in` does not yield a representable expiry.
    pub fn from_grant(
        access_token: String,
        refresh_token: Option<String>,
        expires_in: i64,
        now: DateTime<Utc>,
    ) -> Option<Self> {
        Some(Self {
            access_token,
            refresh_token,
            expires_at: expiry_after(now, expires_in)?,
            created_at: now.timestamp(),
        })
    }

    /// A refreshed session: new access token and expiry, same refresh token
    /// and sign-in time.
    pub fn refreshed(
        &self,
        access_token: String,
        expires_in: i64,
        now: DateTime<Utc>,
    ) -> Option<Self> {
        Some(Self {
            access_token,
            refresh_token: self.refresh_token.clone(),
            expires_at: expiry_after(now, expires_in)?,
            created_at: self.created_at,
        })
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.expires_at
    }

    /// Past [`SESSION_LIFETIME_SECS`] since sign-in.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        now.timestamp().saturating_sub(self.created_at) >= SESSION_LIFETIME_SECS
    }
}

fn expiry_after(now: DateTime<Utc>, expires_in: i64) -> Option<i64> {
    let lifetime = Duration::try_seconds(expires_in)?;
    now.checked_add_signed(lifetime).map(|at| at.timestamp())
}
