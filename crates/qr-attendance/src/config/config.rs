//! Configuration management for qr-attendance.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths, validation, and atomic write operations.

use crate::{
    AppError, AppResult,
    config::{
        ApiConfig, BehaviourConfig, CameraBackend, CameraConfig, ExportConfig, ScannerConfig,
    },
};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::config::{
    DEFAULT_AUTO_SAVE, DEFAULT_SOUND_ENABLED, default_base_url, default_height,
    default_poll_interval_ms, default_timeout_secs, default_width,
};
use directories::{ProjectDirs, UserDirs};
use error_location::ErrorLocation;
use qr_attendance_core::{FacingMode, Resolution};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Main configuration struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Attendance backend settings.
    pub api: ApiConfig,
    /// Camera settings.
    pub camera: CameraConfig,
    /// Decode loop settings.
    pub scanner: ScannerConfig,
    /// Application behavior settings.
    pub behavior: BehaviourConfig,
    /// CSV export settings.
    pub export: ExportConfig,
}

impl Config {
    /// Load configuration from the platform config directory, creating a
    /// default file if none exists.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            info!("No config found, creating default");
            Self::create_default(&config_path)
        }
    }

    /// Load configuration from an explicit path.
    #[track_caller]
    #[instrument]
    pub fn load_from(config_path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(config_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to read config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?config_path, "Configuration loaded");

        Ok(config)
    }

    /// Reject values the scanner cannot run with.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn validate(&self) -> AppResult<()> {
        if self.scanner.poll_interval_ms == 0 {
            return Err(AppError::ConfigError {
                reason: "scanner.poll_interval_ms must be greater than zero".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if !(self.api.base_url.starts_with("http://") || self.api.base_url.starts_with("https://"))
        {
            return Err(AppError::ConfigError {
                reason: format!(
                    "api.base_url must be an http(s) URL, got {:?}",
                    self.api.base_url
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if self.camera.backend == CameraBackend::Replay && !self.camera.frames_dir.is_dir() {
            warn!(
                frames_dir = ?self.camera.frames_dir,
                "Replay frame directory missing; the camera will fail to start"
            );
        }

        Ok(())
    }

    /// Save configuration to `config_path` using atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save_to(&self, config_path: &Path) -> AppResult<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        // Atomic write: write to temp file then rename
        let temp_path = config_path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, config_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?config_path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Defaults rooted at `data_dir` (frames) and `export_dir` (CSV output).
    pub fn with_dirs(data_dir: &Path, export_dir: &Path) -> Self {
        Config {
            api: ApiConfig {
                base_url: default_base_url(),
                timeout_secs: default_timeout_secs(),
            },
            camera: CameraConfig {
                backend: CameraBackend::Replay,
                facing_mode: FacingMode::Environment,
                width: default_width(),
                height: default_height(),
                frames_dir: data_dir.join("frames"),
                environment_index: 0,
                user_index: 0,
            },
            scanner: ScannerConfig {
                poll_interval_ms: default_poll_interval_ms(),
            },
            behavior: BehaviourConfig {
                sound_enabled: DEFAULT_SOUND_ENABLED,
                auto_save: DEFAULT_AUTO_SAVE,
            },
            export: ExportConfig {
                output_dir: export_dir.to_path_buf(),
            },
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.scanner.poll_interval_ms)
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    pub fn resolution(&self) -> Resolution {
        Resolution {
            width: self.camera.width,
            height: self.camera.height,
        }
    }

    #[track_caller]
    fn project_dirs() -> AppResult<ProjectDirs> {
        ProjectDirs::from("com", "qr-attendance", "QR-Attendance").ok_or_else(|| {
            AppError::ConfigError {
                reason: "Failed to get project directories".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        let proj_dirs = Self::project_dirs()?;
        let config_dir = proj_dirs.config_dir();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            debug!(config_dir = ?config_dir, "Created config directory");
        }

        Ok(config_dir.join("config.toml"))
    }

    #[track_caller]
    fn create_default(config_path: &Path) -> AppResult<Self> {
        let proj_dirs = Self::project_dirs()?;
        let data_dir = proj_dirs.data_dir();

        let export_dir = UserDirs::new()
            .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
            .unwrap_or_else(|| data_dir.join("exports"));

        let config = Config::with_dirs(data_dir, &export_dir);
        config.save_to(config_path)?;

        warn!(
            frames_dir = ?config.camera.frames_dir,
            "Default config created. Add frame images or switch camera.backend to native."
        );

        Ok(config)
    }
}
