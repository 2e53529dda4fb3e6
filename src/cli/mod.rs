//! CLI module for the study timer.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `display`: Output formatting and display logic
//! - `session`: Interactive timer session over stdin

pub mod commands;
pub mod display;
pub mod session;

pub use commands::{Cli, Commands, ConfigAction, ConfigSetArgs, RunArgs};
pub use display::Display;
pub use session::{run_session, CommandError, SessionCommand};
