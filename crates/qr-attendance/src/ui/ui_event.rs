use crate::ui::{AudioCue, Toast};

use std::path::PathBuf;

use qr_attendance_core::ApiResponse;

/// One row of the records list, already formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRow {
    /// Identifier.
    pub user_id: String,
    /// Locale-style timestamp.
    pub time: String,
}

/// Changes pushed to the front end.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// New attendance status line.
    AttendanceStatus(String),
    /// Last scan panel became visible or changed.
    LastScan {
        /// Identifier.
        data: String,
        /// Locale-style timestamp.
        time: String,
    },
    /// Records list replaced.
    Records(Vec<RecordRow>),
    /// Transient notification.
    Toast(Toast),
    /// Sound to play.
    Cue(AudioCue),
    /// Backend answer to a generate request.
    CodeGenerated {
        /// Identifier that was encoded.
        user_id: String,
        /// Raw backend payload.
        response: ApiResponse,
    },
    /// CSV written to disk.
    Exported(PathBuf),
    /// Free-form text such as help output.
    Notice(String),
}
