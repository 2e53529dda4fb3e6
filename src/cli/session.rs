//! Interactive terminal session.
//!
//! Reads one command per line from stdin and forwards it to a
//! [`TimerController`], while printing [`TimerEvent`]s as they arrive.

use std::str::FromStr;

use anyhow::{Context, Result};
use thiserror::Error;
use tokio::io::{stdin, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

use crate::engine::{TimerController, TimerEvent};
use crate::types::{SessionMode, SettingField, SettingsError, SettingsPatch};

use super::display::Display;

// ============================================================================
// SessionCommand
// ============================================================================

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Toggle,
    Reset,
    Select(SessionMode),
    Set(SettingsPatch),
    Status,
    Help,
    Quit,
}

/// Errors from parsing a session command.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}' (type 'help' for a list)")]
    Unknown(String),

    #[error("usage: set <work|short|long|auto-breaks|auto-work> <value>")]
    SetUsage,

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

impl FromStr for SessionCommand {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(SessionCommand::Status);
        };

        let command = match head.to_ascii_lowercase().as_str() {
            "t" | "toggle" | "start" | "pause" | "p" => SessionCommand::Toggle,
            "r" | "reset" => SessionCommand::Reset,
            "w" | "work" | "pomodoro" => SessionCommand::Select(SessionMode::Work),
            "s" | "short" => SessionCommand::Select(SessionMode::ShortBreak),
            "l" | "long" => SessionCommand::Select(SessionMode::LongBreak),
            "?" | "status" => SessionCommand::Status,
            "h" | "help" => SessionCommand::Help,
            "q" | "quit" | "exit" => SessionCommand::Quit,
            "set" => {
                let (Some(field), Some(value), None) = (words.next(), words.next(), words.next())
                else {
                    return Err(CommandError::SetUsage);
                };
                let field: SettingField = field.parse()?;
                SessionCommand::Set(field.parse_patch(value)?)
            }
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

// ============================================================================
// Session loop
// ============================================================================

/// Runs the interactive session until `quit`, end of input, or Ctrl-C.
///
/// # Errors
///
/// Returns an error if stdin cannot be read.
pub async fn run_session(
    controller: TimerController,
    mut events: mpsc::UnboundedReceiver<TimerEvent>,
) -> Result<()> {
    let mut lines = BufReader::new(stdin()).lines();

    Display::show_status(&controller.snapshot().await);
    println!("Type 'help' for commands.");

    loop {
        // Pending events print before the next command runs.
        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                let snapshot = controller.snapshot().await;
                Display::show_event(&event, &snapshot);
            }
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    debug!("stdin closed");
                    break;
                };
                match line.parse::<SessionCommand>() {
                    Ok(SessionCommand::Quit) => break,
                    Ok(command) => execute(&controller, command).await,
                    Err(e) => Display::show_error(&e.to_string()),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        }
    }

    controller.shutdown().await;
    let snapshot = controller.snapshot().await;
    println!(
        "Pomodoros completed today: {}",
        snapshot.state.completed_work_sessions
    );
    Ok(())
}

async fn execute(controller: &TimerController, command: SessionCommand) {
    match command {
        SessionCommand::Toggle => controller.toggle_running().await,
        SessionCommand::Reset => controller.reset().await,
        SessionCommand::Select(mode) => controller.select_mode(mode).await,
        SessionCommand::Set(patch) => {
            let clamps = controller.update_settings(patch).await;
            Display::show_clamps(&clamps);
        }
        SessionCommand::Status => Display::show_status(&controller.snapshot().await),
        SessionCommand::Help => Display::show_help(),
        SessionCommand::Quit => {}
    }
}
