use error_location::ErrorLocation;
use thiserror::Error;

/// Message used when the backend rejects a request without an `error` field.
pub const GENERIC_API_ERROR: &str = "API request failed";

/// Scanner errors with source location tracking.
#[derive(Error, Debug)]
pub enum ScanError {
    /// Camera permission denied or no device matched the request.
    #[error("Camera access error: {reason} {location}")]
    CameraAccess {
        /// Description of the camera failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The active video track has no torch capability.
    #[error("Flash not supported {location}")]
    FlashUnsupported {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// An operation required a running stream but none is active.
    #[error("No active camera stream {location}")]
    NoActiveStream {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Api {
        /// Server-provided message, or [`GENERIC_API_ERROR`].
        message: String,
        /// HTTP status code of the response.
        status: u16,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Transport or body decoding failure talking to the backend.
    #[error("HTTP error: {source} {location}")]
    Http {
        /// Underlying reqwest error.
        #[source]
        source: reqwest::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Frame sampling or QR decoding failed.
    #[error("Decode error: {reason} {location}")]
    Decode {
        /// Description of the decode failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Serializing records for export failed.
    #[error("Export error: {reason} {location}")]
    Export {
        /// Description of the export failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl ScanError {
    /// Message suitable for a user-facing toast, without location details.
    pub fn user_message(&self) -> String {
        match self {
            ScanError::CameraAccess { reason, .. } => reason.clone(),
            ScanError::FlashUnsupported { .. } => "Flash not supported".to_string(),
            ScanError::NoActiveStream { .. } => "No active camera stream".to_string(),
            ScanError::Api { message, .. } => message.clone(),
            ScanError::Http { source, .. } => source.to_string(),
            ScanError::Decode { reason, .. } | ScanError::Export { reason, .. } => reason.clone(),
        }
    }
}

/// Result type alias using [`ScanError`].
pub type Result<T> = std::result::Result<T, ScanError>;
