use crate::{
    AttendanceRecord, CoreResult, ScanError, ScanOrigin,
    camera::CaptureController,
    decode::QrDecoder,
    scan::{Clock, LoopExit, ScanEvent},
};

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Polls the capture controller for frames and feeds them to a decoder.
///
/// Steps run strictly one after another: the next sample is taken only after
/// the previous decode finished and the session's poll interval elapsed.
/// Clearing the scanning flag is observed at the next step boundary.
#[derive(Debug)]
pub struct DecodeLoop<C, D> {
    clock: C,
    decoder: Arc<D>,
}

impl<C: Clone, D> Clone for DecodeLoop<C, D> {
    fn clone(&self) -> Self {
        Self {
            clock: self.clock.clone(),
            decoder: Arc::clone(&self.decoder),
        }
    }
}

/// What one blocking sample/decode pass produced.
enum Sample {
    Exit(LoopExit),
    FrameFailed(ScanError),
    Decoded(CoreResult<Option<String>>),
}

impl<C: Clock, D: QrDecoder + 'static> DecodeLoop<C, D> {
    /// Loop stamping records with `clock` and reading frames with `decoder`.
    pub fn new(clock: C, decoder: D) -> Self {
        Self {
            clock,
            decoder: Arc::new(decoder),
        }
    }

    /// Run until `session_id` stops scanning or `events` is closed.
    ///
    /// Sleeps the controller's poll interval between steps. Frame and decode
    /// failures are logged and the loop keeps going.
    #[instrument(skip(self, controller, events))]
    pub async fn run(
        &self,
        controller: Arc<Mutex<CaptureController>>,
        session_id: Uuid,
        events: mpsc::Sender<ScanEvent>,
    ) -> LoopExit {
        let interval = controller.lock().await.poll_interval();
        info!(interval_ms = interval.as_millis(), "Decode loop started");

        let exit = loop {
            if let Some(exit) = self.step(&controller, session_id, &events).await {
                break exit;
            }
            self.clock.sleep(interval).await;
        };

        info!(exit = ?exit, "Decode loop finished");

        exit
    }

    /// One sample/decode cycle. Returns `Some` when the loop must end.
    async fn step(
        &self,
        controller: &Arc<Mutex<CaptureController>>,
        session_id: Uuid,
        events: &mpsc::Sender<ScanEvent>,
    ) -> Option<LoopExit> {
        if events.is_closed() {
            return Some(LoopExit::ReceiverDropped);
        }

        // Frame grabs and grid detection block, so both run on the blocking
        // pool. The controller lock is released before decoding.
        let controller = Arc::clone(controller);
        let decoder = Arc::clone(&self.decoder);
        let sample = tokio::task::spawn_blocking(move || {
            let frame = {
                let mut controller = controller.blocking_lock();

                if !controller.is_scanning_session(session_id) {
                    return Sample::Exit(if controller.is_scanning() {
                        LoopExit::SessionReplaced
                    } else {
                        LoopExit::Stopped
                    });
                }

                controller.sample_frame()
            };

            match frame {
                Ok(frame) => Sample::Decoded(decoder.decode(&frame)),
                Err(e) => Sample::FrameFailed(e),
            }
        })
        .await;

        let payload = match sample {
            Ok(Sample::Exit(exit)) => return Some(exit),
            Ok(Sample::FrameFailed(e)) => {
                warn!(error = %e, "Failed to sample frame");
                return None;
            }
            Ok(Sample::Decoded(Ok(Some(payload)))) => payload,
            Ok(Sample::Decoded(Ok(None))) => return None,
            Ok(Sample::Decoded(Err(e))) => {
                debug!(error = %e, "Decode failed");
                return None;
            }
            Err(e) => {
                error!(error = ?e, "Sample task panicked");
                return None;
            }
        };

        let record = AttendanceRecord::new(payload, self.clock.now(), ScanOrigin::Automatic);
        info!(user_id = %record.user_id(), "QR code scanned");

        if events
            .send(ScanEvent::Decoded { session_id, record })
            .await
            .is_err()
        {
            return Some(LoopExit::ReceiverDropped);
        }

        None
    }
}
