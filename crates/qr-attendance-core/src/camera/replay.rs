//! Camera device that replays still images from disk.
//!
//! Useful on machines without a webcam and for kiosk demos: every grab
//! returns the next image of the directory, wrapping around at the end.

use crate::{
    CoreResult, ScanError,
    camera::{
        CameraDevice, GrayFrame, StreamRequest, TrackCapabilities, TrackConstraints,
        TrackSettings, VideoStream,
    },
};

use std::{
    fs,
    panic::Location,
    path::{Path, PathBuf},
};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument};

const FRAME_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Replays image files as a video stream.
///
/// If `root` has an `environment/` or `user/` subdirectory, the one matching
/// the requested facing mode is used; otherwise `root` itself.
#[derive(Debug, Clone)]
pub struct ReplayCamera {
    root: PathBuf,
}

impl ReplayCamera {
    /// Replay frames found under `root`.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn frames_dir(&self, request: &StreamRequest) -> PathBuf {
        let per_mode = self.root.join(request.facing_mode.as_str());
        if per_mode.is_dir() { per_mode } else { self.root.clone() }
    }
}

impl CameraDevice for ReplayCamera {
    #[track_caller]
    #[instrument(skip(self))]
    fn open(&mut self, request: StreamRequest) -> CoreResult<Box<dyn VideoStream>> {
        let dir = self.frames_dir(&request);

        let entries = fs::read_dir(&dir).map_err(|e| ScanError::CameraAccess {
            reason: format!("Cannot open frame directory {:?}: {}", dir, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let mut frames: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| is_frame_file(path))
            .collect();
        frames.sort();

        let first = frames.first().ok_or_else(|| ScanError::CameraAccess {
            reason: format!("No camera frames found in {:?}", dir),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let first_frame = load_frame(first)?;

        info!(
            dir = ?dir,
            frame_count = frames.len(),
            "Replay camera opened"
        );

        Ok(Box::new(ReplayStream {
            settings: TrackSettings {
                torch: false,
                width: first_frame.width(),
                height: first_frame.height(),
            },
            frames,
            next: 0,
            stopped: false,
        }))
    }
}

struct ReplayStream {
    frames: Vec<PathBuf>,
    next: usize,
    settings: TrackSettings,
    stopped: bool,
}

impl VideoStream for ReplayStream {
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
        if self.stopped {
            return Err(ScanError::Decode {
                reason: "Video track has ended".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let path = &self.frames[self.next % self.frames.len()];
        self.next = (self.next + 1) % self.frames.len();

        debug!(path = ?path, "Replaying frame");

        load_frame(path)
    }

    fn stop_tracks(&mut self) {
        self.stopped = true;
    }
}

fn is_frame_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                FRAME_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            })
}

#[track_caller]
fn load_frame(path: &Path) -> CoreResult<GrayFrame> {
    let image = image::open(path).map_err(|e| ScanError::Decode {
        reason: format!("Failed to read frame {:?}: {}", path, e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    Ok(GrayFrame::from(image.to_luma8()))
}
