// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, FixedOffset, Utc};

/// Display format for play history, e.g. `07:15 PM, March 04, 2024`.
const PLAYED_AT_FORMAT: &str = "%I:%M %p, %B %d, %Y";

/// Format an upstream RFC3339 timestamp in the display offset.
///
/// Returns `None` if the timestamp cannot be parsed.
pub fn format_played_at(raw: &str, offset: &FixedOffset) -> Option<String> {
    let utc = DateTime::parse_from_rfc3339(raw).ok()?.with_timezone(&Utc);
    Some(utc.with_timezone(offset).format(PLAYED_AT_FORMAT).to_string())
}
