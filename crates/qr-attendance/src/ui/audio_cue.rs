/// Sounds played after a scan attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    /// Attendance was accepted.
    Success,
    /// The backend refused or could not be reached.
    Error,
}
