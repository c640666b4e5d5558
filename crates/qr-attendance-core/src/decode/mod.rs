use crate::{CoreResult, ScanError, camera::GrayFrame};

use std::panic::Location;

use error_location::ErrorLocation;
use rqrr::PreparedImage;
use tracing::{debug, instrument};

/// Turns a greyscale frame into a QR payload.
pub trait QrDecoder: Send + Sync {
    /// Returns `Ok(None)` when the frame holds no readable code.
    fn decode(&self, frame: &GrayFrame) -> CoreResult<Option<String>>;
}

/// [`QrDecoder`] backed by `rqrr`.
///
/// Returns the first grid that decodes. Grids that are detected but fail to
/// decode are reported as an error only when no other grid succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct RqrrDecoder;

impl QrDecoder for RqrrDecoder {
    #[track_caller]
    #[instrument(skip(self, frame), fields(width = frame.width(), height = frame.height()))]
    fn decode(&self, frame: &GrayFrame) -> CoreResult<Option<String>> {
        if frame.is_empty() {
            return Ok(None);
        }

        let mut prepared = PreparedImage::prepare_from_greyscale(
            frame.width() as usize,
            frame.height() as usize,
            |x, y| frame.luma(x, y),
        );

        let grids = prepared.detect_grids();
        let mut last_failure = None;

        for grid in grids {
            match grid.decode() {
                Ok((_, content)) => {
                    debug!(content_len = content.len(), "QR code decoded");
                    return Ok(Some(content));
                }
                Err(e) => last_failure = Some(e),
            }
        }

        match last_failure {
            Some(e) => Err(ScanError::Decode {
                reason: format!("QR grid found but unreadable: {:?}", e),
                location: ErrorLocation::from(Location::caller()),
            }),
            None => Ok(None),
        }
    }
}
