use chrono::{DateTime, SecondsFormat, Utc};

use crate::core::errors::{AppError, AppResult};

pub mod posts;
pub mod sections;
pub mod stories;

pub(crate) fn parse_timestamp(value: String) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&value)
        .map(|v| v.with_timezone(&Utc))
        .map_err(|err| AppError::Database(format!("invalid timestamp {value}: {err}")))
}

/// Same shape as the `strftime('%Y-%m-%dT%H:%M:%fZ')` column defaults.
pub(crate) fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}
