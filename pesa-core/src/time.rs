//! Time utilities: statement timestamps and query bounds.

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};

/// Layout of the completion time column on M-PESA statements.
pub const STATEMENT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a statement timestamp like "2024-01-05 10:00:00".
/// Returns None for text that matches the shape but not the calendar (e.g. month 13).
pub fn parse_statement_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), STATEMENT_TIMESTAMP_FORMAT).ok()
}

/// Parse a user-supplied query bound.
///
/// Accepts a bare date ("2024-01-05", taken as midnight) or an ISO date-time
/// with either a space or `T` separator, with or without seconds.
pub fn parse_query_bound(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();

    for fmt in [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }

    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("invalid date '{s}': {e}"))?;
    date.and_hms_opt(0, 0, 0)
        .ok_or_else(|| anyhow::anyhow!("invalid date '{s}'"))
}
