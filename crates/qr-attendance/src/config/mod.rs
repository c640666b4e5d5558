mod api_config;
mod behaviour_config;
mod camera_config;
#[allow(clippy::module_inception)]
mod config;
mod export_config;
mod scanner_config;

pub(crate) use {
    api_config::ApiConfig, behaviour_config::BehaviourConfig, camera_config::CameraBackend,
    camera_config::CameraConfig, config::Config, export_config::ExportConfig,
    scanner_config::ScannerConfig,
};

use qr_attendance_core::{DEFAULT_BASE_URL, DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT, Resolution};

pub(crate) const DEFAULT_SOUND_ENABLED: bool = true;
pub(crate) const DEFAULT_AUTO_SAVE: bool = true;

pub(crate) fn default_sound_enabled() -> bool {
    DEFAULT_SOUND_ENABLED
}

pub(crate) fn default_auto_save() -> bool {
    DEFAULT_AUTO_SAVE
}

pub(crate) fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

pub(crate) fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

pub(crate) fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis() as u64
}

pub(crate) fn default_width() -> u32 {
    Resolution::default().width
}

pub(crate) fn default_height() -> u32 {
    Resolution::default().height
}
