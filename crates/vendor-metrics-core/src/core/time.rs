// crates/vendor-metrics-core/src/core/time.rs
// ============================================================================
// Module: Vendor Metrics Time Model
// Description: Datetime parsing, rendering, and clock sources.
// Purpose: Keep datetime wire formats and wall-clock reads in one place.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! Purchase order datetimes are accepted in several textual forms and always
//! rendered as `YYYY-MM-DD HH:MM:SS` in UTC. Values are normalized to UTC and
//! truncated to microsecond precision so they survive storage as unix
//! microseconds without drift.
//!
//! The service never reads wall-clock time directly; it asks a [`Clock`].
//! [`SystemClock`] is the production source and [`ManualClock`] lets tests
//! control time explicitly.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Mutex;
use std::sync::PoisonError;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serializer;
use thiserror::Error;
use time::Date;
use time::Duration;
use time::OffsetDateTime;
use time::PrimitiveDateTime;
use time::UtcOffset;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

// ============================================================================
// SECTION: Formats
// ============================================================================

/// Output format for every rendered datetime.
const DISPLAY_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
/// Space-separated input format with optional fractional seconds.
const SPACE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day] [hour]:[minute]:[second][optional [.[subsecond]]]"
);
/// `T`-separated input format without an offset.
const NAIVE_ISO_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
);
/// Date-only input format (midnight UTC).
const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Datetime conversion errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimeError {
    /// Input text did not match any accepted format.
    #[error("invalid datetime: {0}")]
    Invalid(String),
    /// Value falls outside the representable range.
    #[error("datetime out of range: {0}")]
    OutOfRange(String),
}

// ============================================================================
// SECTION: Parsing and Rendering
// ============================================================================

/// Parses a datetime from any accepted input form.
///
/// Accepted forms are RFC 3339 (`2024-05-06T12:00:00Z`), `2024-05-06 12:00:00`,
/// `2024-05-06T12:00:00` and `2024-05-06`. Forms without an offset are read as
/// UTC.
///
/// # Errors
///
/// Returns [`TimeError::Invalid`] when no accepted form matches.
pub fn parse_datetime(value: &str) -> Result<OffsetDateTime, TimeError> {
    let trimmed = value.trim();
    if let Ok(parsed) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return Ok(normalize(parsed));
    }
    if let Ok(parsed) = PrimitiveDateTime::parse(trimmed, SPACE_FORMAT) {
        return Ok(normalize(parsed.assume_utc()));
    }
    if let Ok(parsed) = PrimitiveDateTime::parse(trimmed, NAIVE_ISO_FORMAT) {
        return Ok(normalize(parsed.assume_utc()));
    }
    if let Ok(parsed) = Date::parse(trimmed, DATE_FORMAT) {
        return Ok(parsed.midnight().assume_utc());
    }
    Err(TimeError::Invalid(format!(
        "'{trimmed}' is not a supported datetime (expected YYYY-MM-DD, YYYY-MM-DD HH:MM:SS, or \
         RFC 3339)"
    )))
}

/// Renders a datetime as `YYYY-MM-DD HH:MM:SS` in UTC.
///
/// # Errors
///
/// Returns [`TimeError::Invalid`] when the value cannot be formatted.
pub fn format_datetime(value: OffsetDateTime) -> Result<String, TimeError> {
    value
        .to_offset(UtcOffset::UTC)
        .format(DISPLAY_FORMAT)
        .map_err(|err| TimeError::Invalid(err.to_string()))
}

/// Normalizes a datetime to UTC with microsecond precision.
#[must_use]
pub fn normalize(value: OffsetDateTime) -> OffsetDateTime {
    let utc = value.to_offset(UtcOffset::UTC);
    let truncated = utc.nanosecond() / 1_000 * 1_000;
    utc.replace_nanosecond(truncated).unwrap_or(utc)
}

/// Converts a datetime to unix microseconds.
///
/// # Errors
///
/// Returns [`TimeError::OutOfRange`] when the value does not fit in `i64`.
pub fn to_unix_micros(value: OffsetDateTime) -> Result<i64, TimeError> {
    i64::try_from(value.unix_timestamp_nanos() / 1_000)
        .map_err(|_| TimeError::OutOfRange(value.to_string()))
}

/// Converts unix microseconds back into a UTC datetime.
///
/// # Errors
///
/// Returns [`TimeError::OutOfRange`] when the value is not representable.
pub fn from_unix_micros(micros: i64) -> Result<OffsetDateTime, TimeError> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(micros) * 1_000)
        .map_err(|err| TimeError::OutOfRange(err.to_string()))
}

// ============================================================================
// SECTION: Serde Adapters
// ============================================================================

/// Serde adapter for required datetime fields.
pub mod datetime {
    use serde::de::Error as _;
    use serde::ser::Error as _;

    use super::Deserialize;
    use super::Deserializer;
    use super::OffsetDateTime;
    use super::Serializer;
    use super::format_datetime;
    use super::parse_datetime;

    /// Serializes a datetime in display form.
    ///
    /// # Errors
    ///
    /// Returns a serializer error when formatting fails.
    pub fn serialize<S: Serializer>(
        value: &OffsetDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let text = format_datetime(*value).map_err(S::Error::custom)?;
        serializer.serialize_str(&text)
    }

    /// Deserializes a datetime from any accepted input form.
    ///
    /// # Errors
    ///
    /// Returns a deserializer error when the text is not a datetime.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<OffsetDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_datetime(&raw).map_err(D::Error::custom)
    }
}

/// Serde adapter for nullable datetime fields.
pub mod option_datetime {
    use serde::de::Error as _;
    use serde::ser::Error as _;

    use super::Deserialize;
    use super::Deserializer;
    use super::OffsetDateTime;
    use super::Serializer;
    use super::format_datetime;
    use super::parse_datetime;

    /// Serializes an optional datetime, rendering `None` as `null`.
    ///
    /// # Errors
    ///
    /// Returns a serializer error when formatting fails.
    pub fn serialize<S: Serializer>(
        value: &Option<OffsetDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => {
                let text = format_datetime(*value).map_err(S::Error::custom)?;
                serializer.serialize_str(&text)
            }
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes an optional datetime.
    ///
    /// # Errors
    ///
    /// Returns a deserializer error when the text is not a datetime.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<OffsetDateTime>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|text| parse_datetime(&text).map_err(D::Error::custom)).transpose()
    }
}

// ============================================================================
// SECTION: Clocks
// ============================================================================

/// Wall-clock source for acknowledgement and snapshot timestamps.
pub trait Clock: Send + Sync {
    /// Returns the current UTC time.
    fn now(&self) -> OffsetDateTime;
}

/// System clock reading the host's UTC time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        normalize(OffsetDateTime::now_utc())
    }
}

/// Manually driven clock for tests and replays.
#[derive(Debug)]
pub struct ManualClock {
    /// Current clock reading.
    current: Mutex<OffsetDateTime>,
}

impl ManualClock {
    /// Creates a clock frozen at `start`.
    #[must_use]
    pub fn new(start: OffsetDateTime) -> Self {
        Self {
            current: Mutex::new(normalize(start)),
        }
    }

    /// Moves the clock forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        let mut guard = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = normalize(guard.saturating_add(delta));
    }

    /// Sets the clock to an explicit reading.
    pub fn set(&self, value: OffsetDateTime) {
        let mut guard = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = normalize(value);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
