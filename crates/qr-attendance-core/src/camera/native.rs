//! Webcam device backed by `nokhwa`.
//!
//! nokhwa's `Camera` is not `Send` on every backend, so each stream owns a
//! worker thread that creates the camera and answers frame requests over a
//! channel.

use crate::{
    CoreResult, ScanError,
    camera::{
        CameraDevice, FacingMode, GrayFrame, StreamRequest, TrackCapabilities, TrackConstraints,
        TrackSettings, VideoStream,
    },
};

use std::{
    panic::Location,
    sync::mpsc,
    thread::{self, JoinHandle},
};

use error_location::ErrorLocation;
use nokhwa::{
    Camera,
    pixel_format::LumaFormat,
    utils::{CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType},
};
use tracing::{debug, error, info, instrument, warn};

const REQUESTED_FPS: u32 = 30;

/// Native webcam. Facing modes map to device indices.
#[derive(Debug, Clone, Copy)]
pub struct NativeCamera {
    environment_index: u32,
    user_index: u32,
}

impl NativeCamera {
    /// Camera opening `environment_index` for the rear camera and
    /// `user_index` for the front one.
    pub fn new(environment_index: u32, user_index: u32) -> Self {
        Self {
            environment_index,
            user_index,
        }
    }

    fn index_for(&self, facing_mode: FacingMode) -> u32 {
        match facing_mode {
            FacingMode::Environment => self.environment_index,
            FacingMode::User => self.user_index,
        }
    }
}

enum WorkerRequest {
    Grab(mpsc::Sender<CoreResult<GrayFrame>>),
    Stop,
}

impl CameraDevice for NativeCamera {
    #[track_caller]
    #[instrument(skip(self))]
    fn open(&mut self, request: StreamRequest) -> CoreResult<Box<dyn VideoStream>> {
        let index = self.index_for(request.facing_mode);
        let (setup_tx, setup_rx) = mpsc::channel::<CoreResult<TrackSettings>>();
        let (request_tx, request_rx) = mpsc::channel::<WorkerRequest>();

        let worker = thread::spawn(move || {
            let mut camera = match open_camera(index, request) {
                Ok(camera) => camera,
                Err(e) => {
                    let _ = setup_tx.send(Err(e));
                    return;
                }
            };

            let resolution = camera.resolution();
            let settings = TrackSettings {
                torch: false,
                width: resolution.width(),
                height: resolution.height(),
            };
            if setup_tx.send(Ok(settings)).is_err() {
                return;
            }

            while let Ok(WorkerRequest::Grab(reply_tx)) = request_rx.recv() {
                let _ = reply_tx.send(capture(&mut camera));
            }

            if let Err(e) = camera.stop_stream() {
                warn!(error = %e, "Failed to stop camera stream");
            }
            debug!(index, "Camera worker exiting");
        });

        let settings = setup_rx.recv().map_err(|_| ScanError::CameraAccess {
            reason: "Camera worker exited during setup".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })??;

        info!(
            index,
            width = settings.width,
            height = settings.height,
            "Native camera opened"
        );

        Ok(Box::new(NativeStream {
            request_tx,
            worker: Some(worker),
            settings,
        }))
    }
}

struct NativeStream {
    request_tx: mpsc::Sender<WorkerRequest>,
    worker: Option<JoinHandle<()>>,
    settings: TrackSettings,
}

impl VideoStream for NativeStream {
    fn capabilities(&self) -> TrackCapabilities {
        TrackCapabilities { torch: false }
    }

    fn settings(&self) -> TrackSettings {
        self.settings
    }

    #[track_caller]
    fn apply_constraints(&mut self, constraints: TrackConstraints) -> CoreResult<()> {
        if constraints.torch.is_some() {
            return Err(ScanError::FlashUnsupported {
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }

    #[track_caller]
    fn grab_frame(&mut self) -> CoreResult<GrayFrame> {
        let (reply_tx, reply_rx) = mpsc::channel();

        self.request_tx
            .send(WorkerRequest::Grab(reply_tx))
            .map_err(|_| ScanError::Decode {
                reason: "Video track has ended".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        reply_rx.recv().map_err(|_| ScanError::Decode {
            reason: "Camera worker dropped the frame request".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?
    }

    fn stop_tracks(&mut self) {
        let _ = self.request_tx.send(WorkerRequest::Stop);

        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            error!("Camera worker panicked");
        }
    }
}

impl Drop for NativeStream {
    fn drop(&mut self) {
        self.stop_tracks();
    }
}

#[track_caller]
fn open_camera(index: u32, request: StreamRequest) -> CoreResult<Camera> {
    let format = RequestedFormat::new::<LumaFormat>(RequestedFormatType::Closest(
        CameraFormat::new_from(
            request.resolution.width,
            request.resolution.height,
            FrameFormat::MJPEG,
            REQUESTED_FPS,
        ),
    ));

    let mut camera =
        Camera::new(CameraIndex::Index(index), format).map_err(|e| ScanError::CameraAccess {
            reason: format!("Failed to open camera {}: {}", index, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    camera.open_stream().map_err(|e| ScanError::CameraAccess {
        reason: format!("Failed to start camera {}: {}", index, e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    Ok(camera)
}

#[track_caller]
fn capture(camera: &mut Camera) -> CoreResult<GrayFrame> {
    let buffer = camera.frame().map_err(|e| ScanError::Decode {
        reason: format!("Failed to capture frame: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let image = buffer
        .decode_image::<LumaFormat>()
        .map_err(|e| ScanError::Decode {
            reason: format!("Failed to decode frame: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    let (width, height) = (image.width(), image.height());
    GrayFrame::new(width, height, image.into_raw())
}
