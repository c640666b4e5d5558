//! QR Attendance: terminal front end for camera-based attendance scanning.

mod app;
mod app_command;
mod command_reader;
mod config;
mod error;
mod presenter;
#[cfg(test)]
mod tests;
mod ui;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    command_reader::CommandReader,
    error::{AppError, Result as AppResult},
    presenter::Presenter,
};

use crate::{
    config::{CameraBackend, Config},
    ui::{ConsoleDispatcher, UiState},
};

use qr_attendance_core::{
    ApiClient, CameraDevice, CaptureController, DecodeLoop, ReplayCamera, RqrrDecoder, TokioClock,
};
use tokio::sync::{mpsc, watch};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "qr_attendance=debug,qr_attendance_core=debug";

/// Application entry point.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        error!("Config validation failed: {:?}", e);
        std::process::exit(1);
    }

    let camera = match build_camera(&config) {
        Ok(camera) => camera,
        Err(e) => {
            error!("Failed to create camera: {:?}", e);
            std::process::exit(1);
        }
    };

    let api = match ApiClient::new(config.api.base_url.clone(), config.api_timeout()) {
        Ok(api) => api,
        Err(e) => {
            error!("Failed to create API client: {:?}", e);
            std::process::exit(1);
        }
    };

    let controller = CaptureController::new(
        camera,
        config.camera.facing_mode,
        config.resolution(),
        config.poll_interval(),
    );
    let decode_loop = DecodeLoop::new(TokioClock, RqrrDecoder);
    let base_url = api.base_url().to_string();
    let presenter = Presenter::new(
        api,
        UiState::new(config.behavior.sound_enabled, config.behavior.auto_save),
        ConsoleDispatcher,
        config.export.output_dir.clone(),
    );

    info!(
        base_url = %base_url,
        facing_mode = %config.camera.facing_mode,
        export_dir = ?presenter.export_dir(),
        "Configuration ready"
    );

    let (command_tx, command_rx) = mpsc::channel(32);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let command_reader = CommandReader::new(command_tx);
    let app = App::new(controller, decode_loop, presenter, command_rx, shutdown_tx);

    tokio::join!(
        async {
            if let Err(e) = command_reader.run(shutdown_rx).await {
                error!(error = ?e, "Command reader error");
            }
        },
        async {
            if let Err(e) = app.run().await {
                error!(error = ?e, "App error");
            }
        }
    );

    // The stdin forwarder may still be parked on a read.
    std::process::exit(0);
}

/// Frame source selected by `camera.backend`.
#[track_caller]
fn build_camera(config: &Config) -> AppResult<Box<dyn CameraDevice>> {
    match config.camera.backend {
        CameraBackend::Replay => Ok(Box::new(ReplayCamera::new(&config.camera.frames_dir))),
        #[cfg(feature = "native-camera")]
        CameraBackend::Native => Ok(Box::new(qr_attendance_core::NativeCamera::new(
            config.camera.environment_index,
            config.camera.user_index,
        ))),
        #[cfg(not(feature = "native-camera"))]
        CameraBackend::Native => Err(AppError::ConfigError {
            reason: "camera.backend = \"native\" needs the native-camera feature".to_string(),
            location: error_location::ErrorLocation::from(std::panic::Location::caller()),
        }),
    }
}
