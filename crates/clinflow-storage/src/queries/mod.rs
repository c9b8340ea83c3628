// SPDX-FileCopyrightText: 2026 Clinflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules for the clinflow schema.

pub mod appointments;
pub mod notifications;

use chrono::{DateTime, Utc};

/// Timestamps are stored as fixed-width UTC text so lexicographic range
/// scans match chronological order.
pub(crate) fn to_sql_ts(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Parse a stored timestamp, reporting the source column on failure.
pub(crate) fn parse_sql_ts(column: usize, text: String) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(&text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                column,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}
