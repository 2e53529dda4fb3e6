//! Study Timer Library
//!
//! This library provides the core functionality for the study timer CLI.
//! It includes:
//! - Pomodoro state machine and countdown clock
//! - Async controller that ticks the engine in real time
//! - Completion notification sinks (log, sound, mock)
//! - JSON configuration persistence
//! - CLI command parsing, display utilities and the interactive session

pub mod cli;
pub mod config;
pub mod engine;
pub mod notify;
pub mod sound;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    Clamped, SessionMode, SettingField, SettingsError, SettingsPatch, TimerSettings, TimerState,
};

pub use engine::{
    ClockToken, CountdownClock, TickOutcome, TimerController, TimerEngine, TimerEvent,
    TimerSnapshot,
};

pub use notify::{
    Completion, FallbackNotifier, LogNotifier, MockNotifier, NotificationSink, NotifyError,
};

pub use sound::{resolve_sound, MockSoundPlayer, SoundError, SoundNotifier, SoundPlayer, SoundSource};

pub use config::{AppConfig, ConfigError, ConfigStore, SoundConfig};
