//! Event dispatch from the presenter to whatever renders the UI.

use crate::ui::{AudioCue, UiEvent};

use std::io::{self, Write};

use tracing::warn;

/// Receives UI changes.
///
/// Injected into the presenter so tests can record events instead of
/// drawing them.
pub trait EventDispatcher: Send + Sync {
    /// Render or record one event.
    fn dispatch(&self, event: UiEvent);
}

/// Renders events as lines on stdout. Audio cues ring the terminal bell.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleDispatcher;

impl ConsoleDispatcher {
    fn render(event: &UiEvent) -> String {
        match event {
            UiEvent::AttendanceStatus(status) => format!("status: {}", status),
            UiEvent::LastScan { data, time } => format!("last scan: {} at {}", data, time),
            UiEvent::Records(rows) if rows.is_empty() => "records: (none)".to_string(),
            UiEvent::Records(rows) => {
                let mut out = format!("records ({}):", rows.len());
                for row in rows {
                    out.push_str(&format!("\n  {:<24} {}", row.user_id, row.time));
                }
                out
            }
            UiEvent::Toast(toast) => format!("[{}] {}", toast.kind.as_str(), toast.message),
            // BEL
            UiEvent::Cue(AudioCue::Success) => "\u{7}".to_string(),
            UiEvent::Cue(AudioCue::Error) => "\u{7}\u{7}".to_string(),
            UiEvent::CodeGenerated { user_id, response } => {
                let detail = response.message.clone().unwrap_or_else(|| {
                    serde_json::Value::Object(response.fields.clone()).to_string()
                });
                format!("generated code for {}: {}", user_id, detail)
            }
            UiEvent::Exported(path) => format!("exported records to {}", path.display()),
            UiEvent::Notice(text) => text.clone(),
        }
    }
}

impl EventDispatcher for ConsoleDispatcher {
    fn dispatch(&self, event: UiEvent) {
        let text = Self::render(&event);
        let mut stdout = io::stdout().lock();

        let result = match event {
            UiEvent::Cue(_) => write!(stdout, "{}", text),
            _ => writeln!(stdout, "{}", text),
        }
        .and_then(|()| stdout.flush());

        if let Err(e) = result {
            warn!(error = %e, "Failed to write UI event to stdout");
        }
    }
}
