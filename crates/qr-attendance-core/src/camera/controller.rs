use crate::{
    CoreResult, ScanError,
    camera::{
        CameraDevice, FacingMode, GrayFrame, Resolution, StreamRequest, TrackConstraints,
        VideoStream,
    },
};

use std::{panic::Location, time::Duration};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Delay between decode attempts when nothing else is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Mutable state of one scanning session.
///
/// Owned by [`CaptureController`]; the stream is replaced, never shared.
pub struct ScanSession {
    facing_mode: FacingMode,
    stream: Option<Box<dyn VideoStream>>,
    scanning: bool,
    poll_interval: Duration,
    session_id: Option<Uuid>,
}

impl ScanSession {
    fn new(facing_mode: FacingMode, poll_interval: Duration) -> Self {
        Self {
            facing_mode,
            stream: None,
            scanning: false,
            poll_interval,
            session_id: None,
        }
    }
}

/// Acquires camera streams and exposes start/stop/toggle operations.
pub struct CaptureController {
    device: Box<dyn CameraDevice>,
    resolution: Resolution,
    session: ScanSession,
}

impl CaptureController {
    /// Create a controller that has not yet opened a stream.
    pub fn new(
        device: Box<dyn CameraDevice>,
        facing_mode: FacingMode,
        resolution: Resolution,
        poll_interval: Duration,
    ) -> Self {
        Self {
            device,
            resolution,
            session: ScanSession::new(facing_mode, poll_interval),
        }
    }

    /// Open a stream for the current facing mode and start scanning.
    ///
    /// Returns the id of the new session, or of the running one if a stream
    /// is already active.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::CameraAccess`] when the device refuses the request.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn start(&mut self) -> CoreResult<Uuid> {
        if let (Some(_), Some(session_id)) = (&self.session.stream, self.session.session_id) {
            debug!(session_id = %session_id, "Stream already active");
            return Ok(session_id);
        }

        let request = StreamRequest {
            facing_mode: self.session.facing_mode,
            resolution: self.resolution,
        };

        let stream = self.device.open(request)?;
        let settings = stream.settings();
        let session_id = Uuid::new_v4();

        self.session.stream = Some(stream);
        self.session.scanning = true;
        self.session.session_id = Some(session_id);

        info!(
            session_id = %session_id,
            facing_mode = %request.facing_mode,
            width = settings.width,
            height = settings.height,
            "Camera stream started"
        );

        Ok(session_id)
    }

    /// Release every track of the current stream and clear the scanning flag.
    ///
    /// Safe to call repeatedly; only the first call after a start releases
    /// anything.
    #[instrument(skip(self))]
    pub fn stop(&mut self) {
        self.session.scanning = false;

        if let Some(mut stream) = self.session.stream.take() {
            stream.stop_tracks();
            info!(session_id = ?self.session.session_id, "Camera stream stopped");
        }

        self.session.session_id = None;
    }

    /// Switch to the opposite camera and restart.
    ///
    /// # Errors
    ///
    /// Propagates the restart failure; scanning stays inactive in that case.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn toggle_camera(&mut self) -> CoreResult<Uuid> {
        self.session.facing_mode = self.session.facing_mode.opposite();
        debug!(facing_mode = %self.session.facing_mode, "Facing mode switched");

        self.stop();
        self.start()
    }

    /// Flip the torch on the active track and return its new state.
    ///
    /// # Errors
    ///
    /// [`ScanError::NoActiveStream`] without a stream,
    /// [`ScanError::FlashUnsupported`] when the track has no torch.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn toggle_flash(&mut self) -> CoreResult<bool> {
        let stream = self
            .session
            .stream
            .as_mut()
            .ok_or_else(|| ScanError::NoActiveStream {
                location: ErrorLocation::from(Location::caller()),
            })?;

        if !stream.capabilities().torch {
            warn!("Torch capability missing on active track");
            return Err(ScanError::FlashUnsupported {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let torch = !stream.settings().torch;
        stream.apply_constraints(TrackConstraints { torch: Some(torch) })?;

        info!(torch, "Flash toggled");

        Ok(torch)
    }

    /// Copy the current video frame of the active stream.
    ///
    /// # Errors
    ///
    /// [`ScanError::NoActiveStream`] when stopped, or the device's own error.
    #[track_caller]
    pub fn sample_frame(&mut self) -> CoreResult<GrayFrame> {
        let stream = self
            .session
            .stream
            .as_mut()
            .ok_or_else(|| ScanError::NoActiveStream {
                location: ErrorLocation::from(Location::caller()),
            })?;

        stream.grab_frame()
    }

    /// Whether a stream is open and frames are being sampled.
    pub fn is_scanning(&self) -> bool {
        self.session.scanning
    }

    /// Whether `session_id` names the session that is currently scanning.
    pub fn is_scanning_session(&self, session_id: Uuid) -> bool {
        self.session.scanning && self.session.session_id == Some(session_id)
    }

    /// Id of the running session, `None` once stopped.
    pub fn session_id(&self) -> Option<Uuid> {
        self.session.session_id
    }

    /// Camera the next `start` opens.
    pub fn facing_mode(&self) -> FacingMode {
        self.session.facing_mode
    }

    /// Pause between decode attempts.
    pub fn poll_interval(&self) -> Duration {
        self.session.poll_interval
    }
}

impl Drop for CaptureController {
    fn drop(&mut self) {
        self.stop();
    }
}
