//! Timestamp utilities

use chrono::{DateTime, SubsecRound, Utc};

use crate::{Error, Result};

/// Get current UTC timestamp, truncated to the microsecond precision we store
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Format a timestamp for storage (RFC 3339, microsecond precision, `Z` suffix)
pub fn to_db(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

/// Parse a timestamp written by [`to_db`] (or any RFC 3339 string)
pub fn from_db(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("Invalid stored timestamp '{}': {}", s, e)))
}

/// Parse a caller-supplied RFC 3339 timestamp
pub fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::InvalidInput(format!("Invalid timestamp '{}': {}", s, e)))
}
