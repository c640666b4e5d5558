//! Line-oriented command surface on stdin.
//!
//! Reads one command per line and forwards parsed [`AppCommand`]s to the
//! main application over an async channel.

use crate::{AppCommand, AppError, AppResult};

use std::{
    io::{self, BufRead},
    panic::Location,
    time::Duration,
};

use error_location::ErrorLocation;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

/// Forwards operator commands to the application.
pub struct CommandReader {
    command_tx: mpsc::Sender<AppCommand>,
}

impl CommandReader {
    pub fn new(command_tx: mpsc::Sender<AppCommand>) -> Self {
        Self { command_tx }
    }

    /// Read stdin until shutdown is signalled.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn run(&self, shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        let (line_tx, line_rx) = mpsc::channel(32);

        // Stdin has no async wait on every platform, so one blocking task
        // forwards lines. It exits on EOF or once line_rx is dropped.
        let handle = tokio::task::spawn_blocking(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        if line_tx.blocking_send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to read stdin");
                        break;
                    }
                }
            }
        });

        self.forward(line_rx, shutdown_rx).await?;

        // The blocking task may stay parked in read_line until the next
        // newline arrives; the runtime reclaims it on exit.
        match tokio::time::timeout(Duration::from_secs(1), handle).await {
            Ok(Ok(())) => debug!("Stdin forwarder stopped cleanly"),
            Ok(Err(e)) => warn!(error = ?e, "Stdin forwarder task panicked"),
            Err(_) => debug!(
                "Stdin forwarder did not stop within timeout, \
                   will be cleaned up on exit"
            ),
        }

        Ok(())
    }

    /// Parse and forward lines from `line_rx` until shutdown.
    ///
    /// End of input stops reading but does not shut the application down.
    pub async fn forward(
        &self,
        mut line_rx: mpsc::Receiver<String>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> AppResult<()> {
        let mut input_open = true;

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Command reader shutting down");
                    break;
                }
                line = line_rx.recv(), if input_open => match line {
                    Some(line) => self.handle_line(&line).await?,
                    None => {
                        info!("Command input closed");
                        input_open = false;
                    }
                },
            }
        }

        Ok(())
    }

    async fn handle_line(&self, line: &str) -> AppResult<()> {
        let command = match AppCommand::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(()),
            Err(e) => {
                warn!(error = %e, "Ignoring invalid command");
                eprintln!("{}", e.user_message());
                return Ok(());
            }
        };

        debug!(command = ?command, "Command received");

        self.command_tx
            .send(command)
            .await
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("Failed to send command: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}
