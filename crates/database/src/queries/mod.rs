//! Query modules, one per entity, plus aggregate statistics

pub mod authors;
pub mod books;
pub mod genres;
pub mod sessions;
pub mod stats;

use chrono::{DateTime, NaiveDate, Utc};
use readstack_core::AppError;
use sqlx::error::ErrorKind;

/// Converts stored Unix milliseconds back to a UTC timestamp.
///
/// Falls back to the epoch for an out-of-range value instead of failing the
/// whole row.
pub(crate) fn datetime_from_millis(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or(DateTime::UNIX_EPOCH)
}

/// Parses a stored ISO-8601 date column
pub(crate) fn date_from_text(value: Option<String>) -> Option<NaiveDate> {
    value.and_then(|s| s.parse::<NaiveDate>().ok())
}

/// Formats a date for its TEXT column
pub(crate) fn date_to_text(value: Option<NaiveDate>) -> Option<String> {
    value.map(|d| d.to_string())
}

/// Maps an insert/update failure, surfacing unique-key violations as Conflict
pub(crate) fn map_write_error(e: sqlx::Error, resource: &str, detail: &str) -> AppError {
    let unique = e
        .as_database_error()
        .is_some_and(|d| d.kind() == ErrorKind::UniqueViolation);
    if unique {
        AppError::conflict(resource, detail)
    } else {
        AppError::database(format!("Failed to write {}", resource), e)
    }
}
