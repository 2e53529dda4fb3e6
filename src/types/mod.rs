//! Core data types for the study timer.
//!
//! This module defines the data structures used for:
//! - Session modes and their cadence
//! - Timer settings with clamping at the point of entry
//! - The live timer state record

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of completed work sessions between long breaks.
pub const LONG_BREAK_INTERVAL: u32 = 4;

// ============================================================================
// SessionMode
// ============================================================================

/// Which countdown is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    /// Focused work session
    #[default]
    Work,
    /// Short break between work sessions
    ShortBreak,
    /// Long break after every fourth work session
    LongBreak,
}

impl SessionMode {
    /// All modes, in display order.
    pub const ALL: [SessionMode; 3] = [
        SessionMode::Work,
        SessionMode::ShortBreak,
        SessionMode::LongBreak,
    ];

    /// Returns the string representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionMode::Work => "work",
            SessionMode::ShortBreak => "short_break",
            SessionMode::LongBreak => "long_break",
        }
    }

    /// Returns the label shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            SessionMode::Work => "Pomodoro",
            SessionMode::ShortBreak => "Short Break",
            SessionMode::LongBreak => "Long Break",
        }
    }

    /// Returns true for either break mode.
    pub fn is_break(&self) -> bool {
        matches!(self, SessionMode::ShortBreak | SessionMode::LongBreak)
    }

    /// Accepted duration range in minutes for this mode.
    pub fn minute_bounds(&self) -> RangeInclusive<u32> {
        match self {
            SessionMode::Work => 1..=120,
            SessionMode::ShortBreak => 1..=30,
            SessionMode::LongBreak => 1..=60,
        }
    }

    /// Returns the mode that follows a completed countdown in `self`.
    ///
    /// `completed_work_sessions` is the counter value *after* the
    /// completed session has been counted.
    pub fn next_after(&self, completed_work_sessions: u32) -> SessionMode {
        match self {
            SessionMode::Work if completed_work_sessions % LONG_BREAK_INTERVAL == 0 => {
                SessionMode::LongBreak
            }
            SessionMode::Work => SessionMode::ShortBreak,
            SessionMode::ShortBreak | SessionMode::LongBreak => SessionMode::Work,
        }
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// SettingsError
// ============================================================================

/// Errors raised while interpreting user-supplied settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// The field name is not recognized.
    #[error("unknown setting '{0}' (expected work, short, long, auto-breaks or auto-work)")]
    UnknownField(String),

    /// The value could not be parsed for the given field.
    #[error("invalid value '{value}' for {field}")]
    InvalidValue {
        /// Field being set
        field: SettingField,
        /// Raw input
        value: String,
    },

    /// A duration lies outside the accepted range.
    #[error("{field} must be between {min} and {max} minutes (got {value})")]
    OutOfRange {
        /// Field being checked
        field: SettingField,
        /// Offending value
        value: u32,
        /// Lower bound
        min: u32,
        /// Upper bound
        max: u32,
    },
}

// ============================================================================
// SettingField
// ============================================================================

/// Names a single field of [`TimerSettings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingField {
    WorkMinutes,
    ShortBreakMinutes,
    LongBreakMinutes,
    AutoStartBreaks,
    AutoStartWork,
}

impl SettingField {
    /// The mode whose duration this field holds, if any.
    pub fn mode(&self) -> Option<SessionMode> {
        match self {
            SettingField::WorkMinutes => Some(SessionMode::Work),
            SettingField::ShortBreakMinutes => Some(SessionMode::ShortBreak),
            SettingField::LongBreakMinutes => Some(SessionMode::LongBreak),
            SettingField::AutoStartBreaks | SettingField::AutoStartWork => None,
        }
    }

    /// Builds a single-field patch from raw text such as `"30"` or `"on"`.
    pub fn parse_patch(&self, raw: &str) -> Result<SettingsPatch, SettingsError> {
        let invalid = || SettingsError::InvalidValue {
            field: *self,
            value: raw.to_string(),
        };

        let minutes = || raw.trim().parse::<u32>().map_err(|_| invalid());
        let flag = || match raw.trim().to_ascii_lowercase().as_str() {
            "on" | "true" | "yes" | "1" => Ok(true),
            "off" | "false" | "no" | "0" => Ok(false),
            _ => Err(invalid()),
        };

        let mut patch = SettingsPatch::default();
        match self {
            SettingField::WorkMinutes => patch.work_minutes = Some(minutes()?),
            SettingField::ShortBreakMinutes => patch.short_break_minutes = Some(minutes()?),
            SettingField::LongBreakMinutes => patch.long_break_minutes = Some(minutes()?),
            SettingField::AutoStartBreaks => patch.auto_start_breaks = Some(flag()?),
            SettingField::AutoStartWork => patch.auto_start_work = Some(flag()?),
        }
        Ok(patch)
    }
}

impl fmt::Display for SettingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SettingField::WorkMinutes => "work duration",
            SettingField::ShortBreakMinutes => "short break duration",
            SettingField::LongBreakMinutes => "long break duration",
            SettingField::AutoStartBreaks => "auto-start breaks",
            SettingField::AutoStartWork => "auto-start work",
        };
        f.write_str(name)
    }
}

impl FromStr for SettingField {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "work" | "pomodoro" => Ok(SettingField::WorkMinutes),
            "short" | "short-break" => Ok(SettingField::ShortBreakMinutes),
            "long" | "long-break" => Ok(SettingField::LongBreakMinutes),
            "auto-breaks" | "auto-start-breaks" => Ok(SettingField::AutoStartBreaks),
            "auto-work" | "auto-start-work" => Ok(SettingField::AutoStartWork),
            other => Err(SettingsError::UnknownField(other.to_string())),
        }
    }
}

// ============================================================================
// TimerSettings
// ============================================================================

fn default_work_minutes() -> u32 {
    25
}

fn default_short_break_minutes() -> u32 {
    5
}

fn default_long_break_minutes() -> u32 {
    15
}

/// Durations per mode and the auto-continue flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    /// Work duration in minutes (1-120)
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u32,
    /// Short break duration in minutes (1-30)
    #[serde(default = "default_short_break_minutes")]
    pub short_break_minutes: u32,
    /// Long break duration in minutes (1-60)
    #[serde(default = "default_long_break_minutes")]
    pub long_break_minutes: u32,
    /// Start the break countdown automatically after a work session
    #[serde(default)]
    pub auto_start_breaks: bool,
    /// Start the work countdown automatically after a break
    #[serde(default)]
    pub auto_start_work: bool,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            short_break_minutes: default_short_break_minutes(),
            long_break_minutes: default_long_break_minutes(),
            auto_start_breaks: false,
            auto_start_work: false,
        }
    }
}

impl TimerSettings {
    /// Returns the configured duration of `mode` in minutes.
    pub fn minutes(&self, mode: SessionMode) -> u32 {
        match mode {
            SessionMode::Work => self.work_minutes,
            SessionMode::ShortBreak => self.short_break_minutes,
            SessionMode::LongBreak => self.long_break_minutes,
        }
    }

    /// Returns the full countdown length of `mode` in seconds.
    pub fn total_seconds(&self, mode: SessionMode) -> u32 {
        self.minutes(mode).saturating_mul(60)
    }

    /// Returns whether the countdown entered after `completed` auto-starts.
    pub fn auto_start_after(&self, completed: SessionMode) -> bool {
        if completed.is_break() {
            self.auto_start_work
        } else {
            self.auto_start_breaks
        }
    }

    /// Checks every duration against its bounds.
    pub fn validate(&self) -> Result<(), SettingsError> {
        for (mode, field) in [
            (SessionMode::Work, SettingField::WorkMinutes),
            (SessionMode::ShortBreak, SettingField::ShortBreakMinutes),
            (SessionMode::LongBreak, SettingField::LongBreakMinutes),
        ] {
            let bounds = mode.minute_bounds();
            let value = self.minutes(mode);
            if !bounds.contains(&value) {
                return Err(SettingsError::OutOfRange {
                    field,
                    value,
                    min: *bounds.start(),
                    max: *bounds.end(),
                });
            }
        }
        Ok(())
    }

    /// Returns a copy with every duration clamped into its bounds.
    #[must_use]
    pub fn clamped(&self) -> Self {
        let mut settings = self.clone();
        let patch = SettingsPatch {
            work_minutes: Some(self.work_minutes),
            short_break_minutes: Some(self.short_break_minutes),
            long_break_minutes: Some(self.long_break_minutes),
            ..SettingsPatch::default()
        };
        patch.apply_to(&mut settings);
        settings
    }
}

// ============================================================================
// SettingsPatch
// ============================================================================

/// A clamp applied while merging a patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clamped {
    /// Field that was adjusted
    pub field: SettingField,
    /// Value the caller asked for
    pub requested: u32,
    /// Value actually stored
    pub applied: u32,
}

/// Partial update of [`TimerSettings`]; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_break_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_break_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_start_breaks: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_start_work: Option<bool>,
}

impl SettingsPatch {
    /// Sets the work duration.
    pub fn with_work_minutes(mut self, minutes: u32) -> Self {
        self.work_minutes = Some(minutes);
        self
    }

    /// Sets the short break duration.
    pub fn with_short_break_minutes(mut self, minutes: u32) -> Self {
        self.short_break_minutes = Some(minutes);
        self
    }

    /// Sets the long break duration.
    pub fn with_long_break_minutes(mut self, minutes: u32) -> Self {
        self.long_break_minutes = Some(minutes);
        self
    }

    /// Sets the auto-start-breaks flag.
    pub fn with_auto_start_breaks(mut self, enabled: bool) -> Self {
        self.auto_start_breaks = Some(enabled);
        self
    }

    /// Sets the auto-start-work flag.
    pub fn with_auto_start_work(mut self, enabled: bool) -> Self {
        self.auto_start_work = Some(enabled);
        self
    }

    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == SettingsPatch::default()
    }

    /// Merges the patch into `settings`, clamping each duration.
    ///
    /// Returns the fields whose requested value was adjusted.
    pub fn apply_to(&self, settings: &mut TimerSettings) -> Vec<Clamped> {
        let mut clamps = Vec::new();

        let durations = [
            (self.work_minutes, SettingField::WorkMinutes, &mut settings.work_minutes),
            (
                self.short_break_minutes,
                SettingField::ShortBreakMinutes,
                &mut settings.short_break_minutes,
            ),
            (
                self.long_break_minutes,
                SettingField::LongBreakMinutes,
                &mut settings.long_break_minutes,
            ),
        ];

        for (requested, field, slot) in durations {
            let Some(requested) = requested else {
                continue;
            };
            let Some(mode) = field.mode() else {
                continue;
            };
            let bounds = mode.minute_bounds();
            let applied = requested.clamp(*bounds.start(), *bounds.end());
            if applied != requested {
                clamps.push(Clamped {
                    field,
                    requested,
                    applied,
                });
            }
            *slot = applied;
        }

        if let Some(flag) = self.auto_start_breaks {
            settings.auto_start_breaks = flag;
        }
        if let Some(flag) = self.auto_start_work {
            settings.auto_start_work = flag;
        }

        clamps
    }
}

// ============================================================================
// TimerState
// ============================================================================

/// The live session record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    /// Active mode
    pub mode: SessionMode,
    /// Seconds left in the active countdown
    pub remaining_seconds: u32,
    /// Length of the active countdown when it was entered
    #[serde(default)]
    pub total_seconds: u32,
    /// Whether the countdown is advancing
    pub is_running: bool,
    /// Work sessions completed since the state was created
    pub completed_work_sessions: u32,
}

impl TimerState {
    /// Creates the initial state: idle in work mode with a full countdown.
    pub fn new(settings: &TimerSettings) -> Self {
        let total_seconds = settings.total_seconds(SessionMode::Work);
        Self {
            mode: SessionMode::Work,
            remaining_seconds: total_seconds,
            total_seconds,
            is_running: false,
            completed_work_sessions: 0,
        }
    }

    /// Switches to `mode` with a full, idle countdown.
    pub fn enter_mode(&mut self, mode: SessionMode, settings: &TimerSettings) {
        self.mode = mode;
        self.is_running = false;
        self.total_seconds = settings.total_seconds(mode);
        self.remaining_seconds = self.total_seconds;
    }

    /// Refills the countdown of the active mode and stops it.
    pub fn rewind(&mut self, settings: &TimerSettings) {
        self.enter_mode(self.mode, settings);
    }

    /// Decrements the countdown by one second.
    ///
    /// Returns true only on the 1 -> 0 transition, which also clears
    /// `is_running`.
    pub fn tick(&mut self) -> bool {
        if self.remaining_seconds == 0 {
            return false;
        }
        self.remaining_seconds -= 1;
        if self.remaining_seconds == 0 {
            self.is_running = false;
            return true;
        }
        false
    }

    /// Fraction of the active countdown already elapsed, in `[0, 1]`.
    ///
    /// Measured against the length the countdown was entered with, so a
    /// settings change mid-countdown does not move the bar.
    pub fn progress(&self) -> f64 {
        let total = self.total_seconds;
        if total == 0 {
            return 0.0;
        }
        let elapsed = f64::from(total) - f64::from(self.remaining_seconds);
        (elapsed / f64::from(total)).clamp(0.0, 1.0)
    }
}

// ============================================================================
// Tests
// ============================================================================
