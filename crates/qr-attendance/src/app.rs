use crate::{AppCommand, AppResult, Presenter, ui::EventDispatcher};

use std::{ops::ControlFlow, sync::Arc};

use qr_attendance_core::{
    CaptureController, Clock, DecodeLoop, QrDecoder, RqrrDecoder, ScanEvent, TokioClock,
};
use tokio::sync::{Mutex, mpsc, watch};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// Main application state.
///
/// A single task owns the presenter and reacts to operator commands and
/// decoded scans in arrival order. Decode loops run as separate tasks and
/// only touch the capture controller.
pub struct App<D, C = TokioClock, Q = RqrrDecoder> {
    pub(crate) controller: Arc<Mutex<CaptureController>>,
    pub(crate) decode_loop: DecodeLoop<C, Q>,
    pub(crate) presenter: Presenter<D>,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) scan_tx: mpsc::Sender<ScanEvent>,
    pub(crate) scan_rx: mpsc::Receiver<ScanEvent>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
    pub(crate) active_session: Option<Uuid>,
}

impl<D, C, Q> App<D, C, Q>
where
    D: EventDispatcher,
    C: Clock + Clone + 'static,
    Q: QrDecoder + 'static,
{
    pub fn new(
        controller: CaptureController,
        decode_loop: DecodeLoop<C, Q>,
        presenter: Presenter<D>,
        command_rx: mpsc::Receiver<AppCommand>,
        shutdown_tx: watch::Sender<bool>,
    ) -> Self {
        let (scan_tx, scan_rx) = mpsc::channel(16);
        Self {
            controller: Arc::new(Mutex::new(controller)),
            decode_loop,
            presenter,
            command_rx,
            scan_tx,
            scan_rx,
            shutdown_tx,
            active_session: None,
        }
    }

    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("QR Attendance starting");

        self.presenter.initial_load().await;
        self.start_scanning().await;

        loop {
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    if self.handle_command(cmd).await.is_break() {
                        info!("Shutdown requested");
                        break;
                    }
                }

                Some(event) = self.scan_rx.recv() => {
                    self.handle_scan_event(event).await;
                }

                signal = tokio::signal::ctrl_c() => {
                    if let Err(e) = signal {
                        error!(error = %e, "Failed to listen for Ctrl-C");
                    }
                    info!("Interrupt received");
                    break;
                }
            }
        }

        self.shutdown().await;
        info!(
            records = self.presenter.ui().records.len(),
            "QR Attendance shut down successfully"
        );

        Ok(())
    }

    /// Apply one operator command. `Break` ends the application.
    #[instrument(skip(self))]
    pub(crate) async fn handle_command(&mut self, cmd: AppCommand) -> ControlFlow<()> {
        match cmd {
            AppCommand::ToggleCamera => self.toggle_camera().await,
            AppCommand::ToggleFlash => {
                let result = self.controller.lock().await.toggle_flash();
                self.presenter.flash_result(result);
            }
            AppCommand::ExportCsv => {
                self.presenter.export_csv().await;
            }
            AppCommand::DateFilter(date) => self.presenter.set_date_filter(date),
            AppCommand::SetSound(enabled) => self.presenter.set_sound_enabled(enabled),
            AppCommand::SetAutoSave(enabled) => self.presenter.set_auto_save(enabled),
            AppCommand::ManualEntry { user_id } => self.presenter.manual_entry(&user_id).await,
            AppCommand::GenerateQr { user_id } => self.presenter.generate_qr(&user_id).await,
            AppCommand::Refresh => self.presenter.update_records_display().await,
            AppCommand::Help => self.presenter.help(),
            AppCommand::Shutdown => return ControlFlow::Break(()),
        }

        ControlFlow::Continue(())
    }

    pub(crate) async fn handle_scan_event(&mut self, event: ScanEvent) {
        match event {
            ScanEvent::Decoded { session_id, record } => {
                if self.active_session != Some(session_id) {
                    warn!(session_id = %session_id, "Scan from a replaced session");
                }
                self.presenter.handle_successful_scan(&record).await;
            }
        }
    }

    /// Open the current camera and start polling it.
    pub(crate) async fn start_scanning(&mut self) {
        let result = self.controller.lock().await.start();
        match result {
            Ok(session_id) => self.attach_loop(session_id),
            Err(e) => {
                error!(error = %e, "Camera access error");
                self.presenter.camera_error(&e);
            }
        }
    }

    async fn toggle_camera(&mut self) {
        let result = self.controller.lock().await.toggle_camera();
        match result {
            Ok(session_id) => self.attach_loop(session_id),
            Err(e) => {
                error!(error = %e, "Failed to switch camera");
                self.active_session = None;
                self.presenter.camera_error(&e);
            }
        }
    }

    /// Spawn a decode loop for `session_id` unless one already runs.
    fn attach_loop(&mut self, session_id: Uuid) {
        if self.active_session == Some(session_id) {
            return;
        }
        self.active_session = Some(session_id);

        let decode_loop = self.decode_loop.clone();
        let controller = Arc::clone(&self.controller);
        let events = self.scan_tx.clone();

        tokio::spawn(async move {
            decode_loop.run(controller, session_id, events).await;
        });

        info!(session_id = %session_id, "Decode loop attached");
    }

    pub(crate) async fn shutdown(&mut self) {
        self.controller.lock().await.stop();
        self.active_session = None;
        let _ = self.shutdown_tx.send(true);
    }
}
