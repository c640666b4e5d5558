use qr_attendance_core::ScanError;

use std::{panic::Location, result::Result as StdResult};

use error_location::ErrorLocation;
use thiserror::Error;

/// Application-level errors for the qr-attendance binary.
///
/// All variants include `ErrorLocation` for call-site tracking.
#[derive(Error, Debug)]
pub enum AppError {
    /// Scanner subsystem error from qr-attendance-core.
    #[error("Scanner error: {source} {location}")]
    Scan {
        /// The underlying scanner error.
        #[source]
        source: ScanError,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// A line on the command surface could not be understood.
    #[error("Invalid command: {reason} {location}")]
    InvalidCommand {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Failed to send message through async channel.
    #[error("Channel send failed: {message} {location}")]
    ChannelSendFailed {
        /// Human-readable error message.
        message: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Configuration loading or saving error.
    #[error("Configuration error: {reason} {location}")]
    ConfigError {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// IO error from filesystem operations.
    #[error("IO error: {source} {location}")]
    IoError {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Location where this error was created.
        location: ErrorLocation,
    },
}

impl AppError {
    /// Message suitable for a toast, without location details.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Scan { source, .. } => source.user_message(),
            AppError::InvalidCommand { reason, .. } | AppError::ConfigError { reason, .. } => {
                reason.clone()
            }
            AppError::ChannelSendFailed { message, .. } => message.clone(),
            AppError::IoError { source, .. } => source.to_string(),
        }
    }
}

// Manual From<ScanError> with location tracking.
// Cannot use #[from] because it does not support extra fields.
impl From<ScanError> for AppError {
    #[track_caller]
    fn from(source: ScanError) -> Self {
        AppError::Scan {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<std::io::Error> for AppError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        AppError::IoError {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Convenience type alias for Results using `AppError`.
pub type Result<T> = StdResult<T, AppError>;
