use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// CSV export configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory `attendance_records.csv` is written to.
    pub output_dir: PathBuf,
}
