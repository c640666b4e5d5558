use crate::AttendanceRecord;

use uuid::Uuid;

/// Emitted by the decode loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// A frame produced a QR payload.
    Decoded {
        /// Session whose stream produced the frame.
        session_id: Uuid,
        /// Record built from the payload.
        record: AttendanceRecord,
    },
}

/// Why a decode loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// The scanning flag was cleared.
    Stopped,
    /// A newer session took over the stream.
    SessionReplaced,
    /// Nobody is listening for scan events anymore.
    ReceiverDropped,
}
