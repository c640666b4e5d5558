mod audio_cue;
mod dispatcher;
pub(crate) mod toast;
mod ui_event;
mod ui_state;

pub(crate) use {
    audio_cue::AudioCue,
    dispatcher::{ConsoleDispatcher, EventDispatcher},
    toast::Toast,
    ui_event::{RecordRow, UiEvent},
    ui_state::{LastScan, UiState},
};
