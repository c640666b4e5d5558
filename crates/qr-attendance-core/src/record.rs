//! Attendance records as produced by the scanner and returned by the backend.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Rendering of a timestamp the backend sent in an unknown format.
pub const INVALID_DATE: &str = "Invalid Date";

/// Locale-style date-time layout, e.g. `1/1/2024, 12:00:00 AM`.
const DISPLAY_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// How a record came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanOrigin {
    /// Decoded from a camera frame.
    Automatic,
    /// Typed in by the operator.
    Manual,
}

impl fmt::Display for ScanOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanOrigin::Automatic => f.write_str("automatic"),
            ScanOrigin::Manual => f.write_str("manual"),
        }
    }
}

/// A single attendance mark created locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    user_id: String,
    timestamp: DateTime<Utc>,
    origin: ScanOrigin,
}

impl AttendanceRecord {
    /// Record for `user_id` captured at `timestamp`.
    pub fn new(user_id: impl Into<String>, timestamp: DateTime<Utc>, origin: ScanOrigin) -> Self {
        Self {
            user_id: user_id.into(),
            timestamp,
            origin,
        }
    }

    /// Decoded or typed identifier.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Capture instant.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Camera or keyboard.
    pub fn origin(&self) -> ScanOrigin {
        self.origin
    }
}

/// A record as listed by `GET /get_attendance`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceEntry {
    /// Identifier that was marked present.
    pub user_id: String,
    /// Server timestamp, kept verbatim.
    pub timestamp: String,
}

impl AttendanceEntry {
    /// Parse the server timestamp into `tz`.
    ///
    /// Accepts RFC 3339, RFC 2822 and naive ISO-like strings. Naive values
    /// are wall-clock time in `tz`; a time skipped by a DST jump yields `None`.
    pub fn parsed_timestamp<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        let raw = self.timestamp.trim();

        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(tz));
        }
        if let Ok(ts) = DateTime::parse_from_rfc2822(raw) {
            return Some(ts.with_timezone(tz));
        }

        NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .and_then(|naive| tz.from_local_datetime(&naive).earliest())
    }

    /// Timestamp rendered in `tz`, or [`INVALID_DATE`].
    pub fn display_timestamp<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        match self.parsed_timestamp(tz) {
            Some(ts) => format_timestamp(&ts),
            None => INVALID_DATE.to_string(),
        }
    }

    /// Calendar date of the timestamp in `tz`.
    pub fn local_date<Tz: TimeZone>(&self, tz: &Tz) -> Option<NaiveDate> {
        self.parsed_timestamp(tz).map(|ts| ts.date_naive())
    }
}

/// Render an instant the way the records list and CSV show it.
pub fn format_timestamp<Tz>(ts: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    ts.format(DISPLAY_FORMAT).to_string()
}

/// Entries whose local date equals `date`, in server order.
pub fn filter_by_date<'a, Tz: TimeZone>(
    entries: &'a [AttendanceEntry],
    date: NaiveDate,
    tz: &Tz,
) -> Vec<&'a AttendanceEntry> {
    entries
        .iter()
        .filter(|entry| entry.local_date(tz) == Some(date))
        .collect()
}
