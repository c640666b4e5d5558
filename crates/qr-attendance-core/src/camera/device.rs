use crate::{CoreResult, camera::GrayFrame};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which physical camera a stream request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Rear camera, pointed away from the operator.
    #[default]
    Environment,
    /// Front camera, pointed at the operator.
    User,
}

impl FacingMode {
    /// The other camera.
    pub fn opposite(self) -> Self {
        match self {
            FacingMode::Environment => FacingMode::User,
            FacingMode::User => FacingMode::Environment,
        }
    }

    /// Lowercase name as used in media constraints.
    pub fn as_str(self) -> &'static str {
        match self {
            FacingMode::Environment => "environment",
            FacingMode::User => "user",
        }
    }
}

impl fmt::Display for FacingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Preferred frame dimensions. Devices treat these as hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Parameters passed to [`CameraDevice::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamRequest {
    /// Requested camera.
    pub facing_mode: FacingMode,
    /// Resolution hint.
    pub resolution: Resolution,
}

/// What the video track can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackCapabilities {
    /// Whether the torch constraint is supported.
    pub torch: bool,
}

/// Current values of the video track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackSettings {
    /// Whether the torch is lit.
    pub torch: bool,
    /// Frame width actually delivered.
    pub width: u32,
    /// Frame height actually delivered.
    pub height: u32,
}

/// Constraints applied to a running track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackConstraints {
    /// Desired torch state; `None` leaves it unchanged.
    pub torch: Option<bool>,
}

/// A source of video streams, one per facing mode.
pub trait CameraDevice: Send {
    /// Acquire a stream. Fails with [`crate::ScanError::CameraAccess`] when
    /// permission is denied or nothing matches the request.
    fn open(&mut self, request: StreamRequest) -> CoreResult<Box<dyn VideoStream>>;
}

/// A live stream with a single video track.
pub trait VideoStream: Send {
    /// Track capabilities.
    fn capabilities(&self) -> TrackCapabilities;

    /// Current track settings.
    fn settings(&self) -> TrackSettings;

    /// Apply constraints to the video track.
    fn apply_constraints(&mut self, constraints: TrackConstraints) -> CoreResult<()>;

    /// Copy the current video frame into a greyscale buffer.
    fn grab_frame(&mut self) -> CoreResult<GrayFrame>;

    /// Stop every track of the stream.
    fn stop_tracks(&mut self);
}
