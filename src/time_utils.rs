// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, Utc};

/// Placeholder for a timestamp the service did not report.
pub const MISSING: &str = "-";

/// Format a timestamp for a table cell, e.g. `6 Jan, 09:00`.
pub fn format_short(date: Option<DateTime<Utc>>) -> String {
    match date {
        Some(date) => date.format("%-d %b, %H:%M").to_string(),
        None => MISSING.to_string(),
    }
}
