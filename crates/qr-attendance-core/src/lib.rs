//! QR Attendance Core Library
//!
//! Camera capture, QR decode loop and attendance backend client.
//!
//! # Example
//!
//! ```no_run
//! use qr_attendance_core::{
//!     ApiClient, CaptureController, CoreResult, DEFAULT_BASE_URL, DEFAULT_TIMEOUT,
//!     DecodeLoop, FacingMode, ReplayCamera, Resolution, RqrrDecoder, ScanEvent, TokioClock,
//! };
//!
//! use std::{sync::Arc, time::Duration};
//!
//! use tokio::sync::{Mutex, mpsc};
//!
//! #[tokio::main]
//! async fn main() -> CoreResult<()> {
//!     let interval = Duration::from_millis(1000);
//!     let mut controller = CaptureController::new(
//!         Box::new(ReplayCamera::new("frames")),
//!         FacingMode::Environment,
//!         Resolution::default(),
//!         interval,
//!     );
//!     let session_id = controller.start()?;
//!     let controller = Arc::new(Mutex::new(controller));
//!
//!     let (events_tx, mut events_rx) = mpsc::channel(8);
//!     let decode_loop = DecodeLoop::new(TokioClock, RqrrDecoder);
//!     tokio::spawn(async move { decode_loop.run(controller, session_id, events_tx).await });
//!
//!     let api = ApiClient::new(DEFAULT_BASE_URL, DEFAULT_TIMEOUT)?;
//!     if let Some(ScanEvent::Decoded { record, .. }) = events_rx.recv().await {
//!         api.mark_attendance(record.user_id()).await?;
//!     }
//!     Ok(())
//! }
//! ```

mod api;
mod camera;
mod decode;
mod error;
mod export;
mod record;
mod scan;

pub use {
    api::{ApiClient, ApiResponse, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, RAW_VALUE_KEY},
    camera::{
        CameraDevice, CaptureController, DEFAULT_POLL_INTERVAL, FacingMode, GrayFrame,
        ReplayCamera, Resolution, ScanSession, StreamRequest, TrackCapabilities,
        TrackConstraints, TrackSettings, VideoStream,
    },
    decode::{QrDecoder, RqrrDecoder},
    error::{GENERIC_API_ERROR, Result as CoreResult, ScanError},
    export::{CSV_FILE_NAME, CSV_HEADER, records_to_csv},
    record::{
        AttendanceEntry, AttendanceRecord, INVALID_DATE, ScanOrigin, filter_by_date,
        format_timestamp,
    },
    scan::{Clock, DecodeLoop, LoopExit, ScanEvent, TokioClock},
};

#[cfg(feature = "native-camera")]
pub use camera::NativeCamera;

#[cfg(test)]
mod tests;
