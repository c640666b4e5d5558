use crate::{AppError, AppResult};

use std::panic::Location;

use chrono::NaiveDate;
use error_location::ErrorLocation;

/// Usage text listing every command the terminal accepts.
pub const COMMAND_HELP: &str = "commands: toggle-camera | toggle-flash | export-csv | \
date-filter <YYYY-MM-DD|clear> | sound <on|off> | auto-save <on|off> | manual <id> | \
generate-qr <id> | refresh | help | quit";

/// Commands sent from the command reader to the main application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Switch between front and back camera.
    ToggleCamera,
    /// Flip the torch on the active camera.
    ToggleFlash,
    /// Fetch records and write them to CSV.
    ExportCsv,
    /// Show only records from one day, or all when `None`.
    DateFilter(Option<NaiveDate>),
    /// Enable or disable audio cues.
    SetSound(bool),
    /// Enable or disable refreshing records after each scan.
    SetAutoSave(bool),
    /// Mark attendance for a typed identifier.
    ManualEntry {
        /// Identifier to mark.
        user_id: String,
    },
    /// Ask the backend to generate a code for an identifier.
    GenerateQr {
        /// Identifier to encode.
        user_id: String,
    },
    /// Reload the records list.
    Refresh,
    /// Print the command list.
    Help,
    /// Request application shutdown.
    Shutdown,
}

impl AppCommand {
    /// Parse one input line. Blank lines yield `None`.
    #[track_caller]
    pub fn parse(line: &str) -> AppResult<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (line, ""),
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "toggle-camera" => AppCommand::ToggleCamera,
            "toggle-flash" => AppCommand::ToggleFlash,
            "export-csv" => AppCommand::ExportCsv,
            "date-filter" => AppCommand::DateFilter(parse_date(arg)?),
            "sound" | "sound-enabled" => AppCommand::SetSound(parse_switch(name, arg)?),
            "auto-save" => AppCommand::SetAutoSave(parse_switch(name, arg)?),
            "manual" => AppCommand::ManualEntry {
                user_id: required(name, arg)?,
            },
            "generate-qr" => AppCommand::GenerateQr {
                user_id: required(name, arg)?,
            },
            "refresh" => AppCommand::Refresh,
            "help" | "?" => AppCommand::Help,
            "quit" | "exit" => AppCommand::Shutdown,
            other => {
                return Err(AppError::InvalidCommand {
                    reason: format!("Unknown command {:?}; {}", other, COMMAND_HELP),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        Ok(Some(command))
    }
}

#[track_caller]
fn parse_date(arg: &str) -> AppResult<Option<NaiveDate>> {
    if arg.is_empty() || arg.eq_ignore_ascii_case("clear") {
        return Ok(None);
    }

    NaiveDate::parse_from_str(arg, "%Y-%m-%d")
        .map(Some)
        .map_err(|e| AppError::InvalidCommand {
            reason: format!("date-filter expects YYYY-MM-DD or clear ({}): {:?}", e, arg),
            location: ErrorLocation::from(Location::caller()),
        })
}

#[track_caller]
fn parse_switch(name: &str, arg: &str) -> AppResult<bool> {
    match arg.to_ascii_lowercase().as_str() {
        "on" | "true" | "1" => Ok(true),
        "off" | "false" | "0" => Ok(false),
        _ => Err(AppError::InvalidCommand {
            reason: format!("{} expects on or off, got {:?}", name, arg),
            location: ErrorLocation::from(Location::caller()),
        }),
    }
}

#[track_caller]
fn required(name: &str, arg: &str) -> AppResult<String> {
    if arg.is_empty() {
        return Err(AppError::InvalidCommand {
            reason: format!("{} expects an identifier", name),
            location: ErrorLocation::from(Location::caller()),
        });
    }
    Ok(arg.to_string())
}
