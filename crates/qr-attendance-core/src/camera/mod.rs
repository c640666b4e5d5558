mod controller;
mod device;
mod frame;
#[cfg(feature = "native-camera")]
mod native;
mod replay;

pub use {
    controller::{CaptureController, DEFAULT_POLL_INTERVAL, ScanSession},
    device::{
        CameraDevice, FacingMode, Resolution, StreamRequest, TrackCapabilities, TrackConstraints,
        TrackSettings, VideoStream,
    },
    frame::GrayFrame,
    replay::ReplayCamera,
};

#[cfg(feature = "native-camera")]
pub use native::NativeCamera;
