use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimeParseError {
    #[error("timestamp cannot be empty")]
    Empty,
    #[error("invalid timestamp: expected RFC 2822 or RFC 3339")]
    InvalidFormat,
}

pub fn now_utc() -> i64 {
    Utc::now().timestamp()
}

/// Parses the `Timestamp` field of a status callback into unix seconds.
///
/// The provider sends RFC 2822 (`Tue, 10 Jan 2023 18:39:19 +0000`); RFC 3339
/// is accepted as well.
pub fn parse_provider_timestamp(input: &str) -> Result<i64, TimeParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(TimeParseError::Empty);
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Ok(dt.with_timezone(&Utc).timestamp());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc).timestamp());
    }

    Err(TimeParseError::InvalidFormat)
}

pub fn format_timestamp(ts: i64) -> String {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .unwrap_or_default()
        .to_rfc3339()
}
