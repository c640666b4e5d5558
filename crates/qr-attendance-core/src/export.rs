//! CSV serialization of attendance entries.

use crate::{AttendanceEntry, CoreResult, ScanError};

use std::{fmt, panic::Location};

use chrono::TimeZone;
use error_location::ErrorLocation;
use tracing::{debug, instrument};

/// File name offered for exported records.
pub const CSV_FILE_NAME: &str = "attendance_records.csv";

/// Header row of the export.
pub const CSV_HEADER: [&str; 2] = ["User ID", "Timestamp"];

/// Serialize entries to CSV text with timestamps rendered in `tz`.
///
/// Rows are separated by `\n` and fields are quoted only when needed.
#[track_caller]
#[instrument(skip(entries, tz), fields(count = entries.len()))]
pub fn records_to_csv<Tz>(entries: &[AttendanceEntry], tz: &Tz) -> CoreResult<String>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(CSV_HEADER)
        .map_err(|e| export_error(format!("Failed to write header: {}", e)))?;

    for entry in entries {
        let timestamp = entry.display_timestamp(tz);
        writer
            .write_record([entry.user_id.as_str(), timestamp.as_str()])
            .map_err(|e| export_error(format!("Failed to write row: {}", e)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| export_error(format!("Failed to flush CSV: {}", e)))?;

    let mut text = String::from_utf8(bytes)
        .map_err(|e| export_error(format!("CSV is not valid UTF-8: {}", e)))?;

    // No newline after the last row.
    if text.ends_with('\n') {
        text.pop();
    }

    debug!(bytes = text.len(), "Records serialized to CSV");

    Ok(text)
}

#[track_caller]
fn export_error(reason: String) -> ScanError {
    ScanError::Export {
        reason,
        location: ErrorLocation::from(Location::caller()),
    }
}
