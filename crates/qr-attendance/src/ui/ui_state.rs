use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use qr_attendance_core::{AttendanceEntry, ScanOrigin, filter_by_date};

/// The most recent accepted scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastScan {
    /// Decoded or typed identifier.
    pub data: String,
    /// When it was captured.
    pub time: DateTime<Utc>,
    /// Camera or keyboard.
    pub origin: ScanOrigin,
}

/// Everything the front end shows, owned by the presenter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    /// Result line of the last attendance submission.
    pub attendance_status: Option<String>,
    /// Last accepted scan, hidden until the first success.
    pub last_scan: Option<LastScan>,
    /// Records as fetched from the backend.
    pub records: Vec<AttendanceEntry>,
    /// Day the records list is narrowed to.
    pub date_filter: Option<NaiveDate>,
    /// Audio cues on or off.
    pub sound_enabled: bool,
    /// Refresh records after each scan.
    pub auto_save: bool,
}

impl UiState {
    pub fn new(sound_enabled: bool, auto_save: bool) -> Self {
        Self {
            sound_enabled,
            auto_save,
            ..Self::default()
        }
    }

    /// Records passing the date filter, in server order.
    pub fn visible_records<Tz: TimeZone>(&self, tz: &Tz) -> Vec<&AttendanceEntry> {
        match self.date_filter {
            Some(date) => filter_by_date(&self.records, date, tz),
            None => self.records.iter().collect(),
        }
    }
}
