use crate::config::{default_auto_save, default_sound_enabled};

use serde::{Deserialize, Serialize};

/// Application behavior configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviourConfig {
    /// Whether to play audio cues after a scan.
    #[serde(default = "default_sound_enabled")]
    pub sound_enabled: bool,

    /// Whether to refresh the records list after every successful scan.
    #[serde(default = "default_auto_save")]
    pub auto_save: bool,
}
