use crate::config::{default_height, default_width};

use qr_attendance_core::FacingMode;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where frames come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CameraBackend {
    /// Image files replayed from `frames_dir`.
    #[default]
    Replay,
    /// A webcam; needs the `native-camera` feature.
    Native,
}

/// Camera configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Frame source.
    #[serde(default)]
    pub backend: CameraBackend,

    /// Camera requested at startup.
    #[serde(default)]
    pub facing_mode: FacingMode,

    /// Preferred frame width.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Preferred frame height.
    #[serde(default = "default_height")]
    pub height: u32,

    /// Image directory for the replay backend.
    pub frames_dir: PathBuf,

    /// Device index used for the environment-facing camera.
    #[serde(default)]
    pub environment_index: u32,

    /// Device index used for the user-facing camera.
    #[serde(default)]
    pub user_index: u32,
}
