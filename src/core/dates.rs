use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::core::{AppError, Result};

/// A validated reporting window: `start` is strictly before `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Parse a pair of raw timestamps into a validated range.
    ///
    /// Accepts RFC 3339 date-times or plain `YYYY-MM-DD` dates (interpreted
    /// as midnight UTC). Fails with a validation error before any upstream
    /// call is made.
    pub fn parse(start_raw: &str, end_raw: &str) -> Result<Self> {
        let start = parse_timestamp(start_raw).ok_or_else(|| {
            AppError::validation(format!("invalid 'start' timestamp: '{}'", start_raw))
        })?;
        let end = parse_timestamp(end_raw).ok_or_else(|| {
            AppError::validation(format!("invalid 'end' timestamp: '{}'", end_raw))
        })?;

        if start >= end {
            return Err(AppError::validation(
                "'start' must be strictly before 'end'",
            ));
        }

        Ok(Self { start, end })
    }
}

/// Lenient timestamp parser: RFC 3339 first, then bare dates.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw.trim()) {
        return Some(parsed.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Calendar month bucket (`YYYY-MM`, UTC) used as the report grouping key.
pub fn month_key(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m").to_string()
}
