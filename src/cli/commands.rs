//! Command definitions for the study timer CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::types::SettingsPatch;

// ============================================================================
// CLI Structure
// ============================================================================

/// Study Timer - a terminal pomodoro timer
#[derive(Parser, Debug)]
#[command(
    name = "study-timer",
    version,
    about = "Terminal pomodoro timer",
    long_about = "A pomodoro timer for focused study sessions.\n\
                  Work, short break and long break countdowns with a long break\n\
                  after every fourth work session.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use this config file instead of the default location
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run an interactive timer session
    Run(RunArgs),

    /// Inspect or change the saved configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// `config` subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Print the effective configuration as JSON
    Show,

    /// Print the config file path
    Path,

    /// Change and save settings
    Set(ConfigSetArgs),
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command. They override the saved config for
/// this session only.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Work duration in minutes (1-120)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=120))]
    pub work: Option<u32>,

    /// Short break duration in minutes (1-30)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=30))]
    pub short_break: Option<u32>,

    /// Long break duration in minutes (1-60)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=60))]
    pub long_break: Option<u32>,

    /// Start breaks automatically when a work session ends
    #[arg(long)]
    pub auto_start_breaks: bool,

    /// Start work automatically when a break ends
    #[arg(long)]
    pub auto_start_work: bool,

    /// Disable completion sounds
    #[arg(long)]
    pub no_sound: bool,
}

impl RunArgs {
    /// Settings overrides carried by the flags.
    pub fn to_patch(&self) -> SettingsPatch {
        SettingsPatch {
            work_minutes: self.work,
            short_break_minutes: self.short_break,
            long_break_minutes: self.long_break,
            auto_start_breaks: self.auto_start_breaks.then_some(true),
            auto_start_work: self.auto_start_work.then_some(true),
        }
    }
}

// ============================================================================
// Config Set Arguments
// ============================================================================

/// Arguments for `config set`
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigSetArgs {
    /// Work duration in minutes (1-120)
    #[arg(short, long)]
    pub work: Option<u32>,

    /// Short break duration in minutes (1-30)
    #[arg(short, long)]
    pub short_break: Option<u32>,

    /// Long break duration in minutes (1-60)
    #[arg(short, long)]
    pub long_break: Option<u32>,

    /// Start breaks automatically (true/false)
    #[arg(long, value_name = "BOOL")]
    pub auto_start_breaks: Option<bool>,

    /// Start work automatically (true/false)
    #[arg(long, value_name = "BOOL")]
    pub auto_start_work: Option<bool>,

    /// Play a sound on completion (true/false)
    #[arg(long, value_name = "BOOL")]
    pub sound: Option<bool>,

    /// Audio file to play on completion
    #[arg(long, value_name = "PATH", conflicts_with = "clear_sound_file")]
    pub sound_file: Option<PathBuf>,

    /// Go back to the built-in chime
    #[arg(long)]
    pub clear_sound_file: bool,
}

impl ConfigSetArgs {
    /// Timer part of the update. Durations are clamped when applied.
    pub fn to_patch(&self) -> SettingsPatch {
        SettingsPatch {
            work_minutes: self.work,
            short_break_minutes: self.short_break,
            long_break_minutes: self.long_break,
            auto_start_breaks: self.auto_start_breaks,
            auto_start_work: self.auto_start_work,
        }
    }

    /// Returns true if no option was given.
    pub fn is_empty(&self) -> bool {
        self.to_patch().is_empty()
            && self.sound.is_none()
            && self.sound_file.is_none()
            && !self.clear_sound_file
    }
}

// ============================================================================
// Tests
// ============================================================================
