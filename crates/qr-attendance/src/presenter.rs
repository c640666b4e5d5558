//! Attendance submission, records rendering and CSV export.
//!
//! The presenter owns [`UiState`] and pushes every visible change through an
//! [`EventDispatcher`]. Backend failures never escape: they become toasts
//! and log lines, so the scan loop keeps running.

use crate::{
    AppResult,
    app_command::COMMAND_HELP,
    ui::{AudioCue, EventDispatcher, LastScan, RecordRow, Toast, UiEvent, UiState},
};

use std::{
    fmt,
    path::{Path, PathBuf},
};

use chrono::{Local, NaiveDate, TimeZone, Utc};
use qr_attendance_core::{
    ApiClient, AttendanceRecord, CSV_FILE_NAME, CoreResult, ScanError, ScanOrigin,
    format_timestamp, records_to_csv,
};
use tokio::fs;
use tracing::{debug, error, info, instrument, warn};

/// Status line shown after the backend accepts a scan.
pub const ATTENDANCE_MARKED: &str = "Attendance marked successfully!";

/// Drives the UI from scan results and operator commands.
pub struct Presenter<D, Tz = Local>
where
    Tz: TimeZone,
{
    api: ApiClient,
    ui: UiState,
    dispatcher: D,
    export_dir: PathBuf,
    tz: Tz,
}

impl<D: EventDispatcher> Presenter<D, Local> {
    /// Presenter rendering times in the system time zone.
    pub fn new(api: ApiClient, ui: UiState, dispatcher: D, export_dir: PathBuf) -> Self {
        Self::with_timezone(api, ui, dispatcher, export_dir, Local)
    }
}

impl<D, Tz> Presenter<D, Tz>
where
    D: EventDispatcher,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    pub fn with_timezone(
        api: ApiClient,
        ui: UiState,
        dispatcher: D,
        export_dir: PathBuf,
        tz: Tz,
    ) -> Self {
        Self {
            api,
            ui,
            dispatcher,
            export_dir,
            tz,
        }
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Submit a decoded or typed identifier and reflect the outcome.
    #[instrument(skip(self, record), fields(user_id = record.user_id(), origin = %record.origin()))]
    pub async fn handle_successful_scan(&mut self, record: &AttendanceRecord) {
        match self.api.mark_attendance(record.user_id()).await {
            Ok(_) => {
                self.ui.attendance_status = Some(ATTENDANCE_MARKED.to_string());
                self.dispatcher
                    .dispatch(UiEvent::AttendanceStatus(ATTENDANCE_MARKED.to_string()));

                let last_scan = LastScan {
                    data: record.user_id().to_string(),
                    time: record.timestamp(),
                    origin: record.origin(),
                };
                self.dispatcher.dispatch(UiEvent::LastScan {
                    data: last_scan.data.clone(),
                    time: format_timestamp(&last_scan.time.with_timezone(&self.tz)),
                });
                self.ui.last_scan = Some(last_scan);

                self.play(AudioCue::Success);
                self.dispatcher
                    .dispatch(UiEvent::Toast(Toast::success(ATTENDANCE_MARKED)));

                info!("Attendance marked");

                if self.ui.auto_save {
                    self.update_records_display().await;
                }
            }
            Err(e) => {
                warn!(error = %e, "Attendance submission failed");
                self.dispatcher.dispatch(UiEvent::Toast(Toast::error(format!(
                    "Error: {}",
                    e.user_message()
                ))));
                // The sound toggle only silences the success cue.
                self.dispatcher.dispatch(UiEvent::Cue(AudioCue::Error));
            }
        }
    }

    /// Mark attendance for an identifier typed by the operator.
    pub async fn manual_entry(&mut self, user_id: &str) {
        let record = AttendanceRecord::new(user_id.trim(), Utc::now(), ScanOrigin::Manual);
        self.handle_successful_scan(&record).await;
    }

    /// Fetch records and re-render. Failures are only logged.
    #[instrument(skip(self))]
    pub async fn update_records_display(&mut self) {
        match self.api.get_attendance_records().await {
            Ok(records) => {
                debug!(count = records.len(), "Records refreshed");
                self.ui.records = records;
                self.render_records();
            }
            Err(e) => error!(error = %e, "Error fetching records"),
        }
    }

    /// First fetch at startup. Failures are shown to the operator.
    #[instrument(skip(self))]
    pub async fn initial_load(&mut self) {
        match self.api.get_attendance_records().await {
            Ok(records) => {
                info!(count = records.len(), "Initial records loaded");
                self.ui.records = records;
                self.render_records();
            }
            Err(e) => {
                error!(error = %e, "Error loading records");
                self.dispatcher.dispatch(UiEvent::Toast(Toast::error(format!(
                    "Error loading records: {}",
                    e.user_message()
                ))));
            }
        }
    }

    /// Fetch records and write them to the export directory as CSV.
    #[instrument(skip(self))]
    pub async fn export_csv(&mut self) -> Option<PathBuf> {
        match self.write_export().await {
            Ok(path) => {
                info!(path = ?path, "Records exported");
                self.dispatcher.dispatch(UiEvent::Exported(path.clone()));
                Some(path)
            }
            Err(e) => {
                error!(error = %e, "Error exporting records");
                self.dispatcher.dispatch(UiEvent::Toast(Toast::error(format!(
                    "Error exporting records: {}",
                    e.user_message()
                ))));
                None
            }
        }
    }

    async fn write_export(&self) -> AppResult<PathBuf> {
        let records = self.api.get_attendance_records().await?;
        let text = records_to_csv(&records, &self.tz)?;

        fs::create_dir_all(&self.export_dir).await?;
        let path = self.export_dir.join(CSV_FILE_NAME);
        fs::write(&path, text).await?;

        Ok(path)
    }

    /// Ask the backend for a code encoding `user_id`.
    #[instrument(skip(self))]
    pub async fn generate_qr(&mut self, user_id: &str) {
        match self.api.generate_qr_code(user_id).await {
            Ok(response) => self.dispatcher.dispatch(UiEvent::CodeGenerated {
                user_id: user_id.to_string(),
                response,
            }),
            Err(e) => self.dispatcher.dispatch(UiEvent::Toast(Toast::error(format!(
                "Error: {}",
                e.user_message()
            )))),
        }
    }

    pub fn set_date_filter(&mut self, date: Option<NaiveDate>) {
        self.ui.date_filter = date;
        self.render_records();
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.ui.sound_enabled = enabled;
        self.notice(format!("sound {}", on_off(enabled)));
    }

    pub fn set_auto_save(&mut self, enabled: bool) {
        self.ui.auto_save = enabled;
        self.notice(format!("auto-save {}", on_off(enabled)));
    }

    /// Report a failure to open or switch the camera.
    pub fn camera_error(&self, e: &ScanError) {
        self.dispatcher.dispatch(UiEvent::Toast(Toast::error(format!(
            "Camera access error: {}",
            e.user_message()
        ))));
    }

    /// Report the outcome of a torch toggle.
    pub fn flash_result(&self, result: CoreResult<bool>) {
        let toast = match result {
            Ok(torch) => {
                debug!(torch, "Torch toggled");
                Toast::success("Flash toggled")
            }
            Err(ScanError::FlashUnsupported { .. }) => Toast::error("Flash not supported"),
            Err(e) => Toast::error(format!("Error: {}", e.user_message())),
        };
        self.dispatcher.dispatch(UiEvent::Toast(toast));
    }

    pub fn help(&self) {
        self.notice(COMMAND_HELP.to_string());
    }

    pub fn notice(&self, text: String) {
        self.dispatcher.dispatch(UiEvent::Notice(text));
    }

    fn render_records(&self) {
        let rows = self
            .ui
            .visible_records(&self.tz)
            .into_iter()
            .map(|entry| RecordRow {
                user_id: entry.user_id.clone(),
                time: entry.display_timestamp(&self.tz),
            })
            .collect();
        self.dispatcher.dispatch(UiEvent::Records(rows));
    }

    fn play(&self, cue: AudioCue) {
        if self.ui.sound_enabled {
            self.dispatcher.dispatch(UiEvent::Cue(cue));
        }
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}
