use crate::config::default_poll_interval_ms;

use serde::{Deserialize, Serialize};

/// Decode loop configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Delay between decode attempts in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}
