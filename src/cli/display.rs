//! Display utilities for the study timer CLI.
//!
//! This module provides formatted output for:
//! - Status lines with a progress bar
//! - Timer events as they arrive
//! - Configuration and error messages

use std::io::{self, Write};

use crate::config::AppConfig;
use crate::engine::{TimerEvent, TimerSnapshot};
use crate::types::{Clamped, SessionMode};

/// Width of the text progress bar, in cells.
const PROGRESS_BAR_WIDTH: usize = 24;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Prints the full status block.
    pub fn show_status(snapshot: &TimerSnapshot) {
        let state = &snapshot.state;
        println!();
        println!("{}", Self::mode_tabs(state.mode));
        println!("─────────────────────────────────────");
        println!(
            "  {}  {}  {}",
            Self::format_time(state.remaining_seconds),
            Self::progress_bar(snapshot.progress, PROGRESS_BAR_WIDTH),
            if state.is_running { "running" } else { "paused" }
        );
        println!(
            "  Pomodoros completed today: {}",
            state.completed_work_sessions
        );
    }

    /// Prints one event. Ticks redraw the current line in place.
    pub fn show_event(event: &TimerEvent, snapshot: &TimerSnapshot) {
        match event {
            TimerEvent::Tick { remaining_seconds } => {
                print!(
                    "\r  {}  {}  ",
                    Self::format_time(*remaining_seconds),
                    Self::progress_bar(snapshot.progress, PROGRESS_BAR_WIDTH)
                );
                let _ = io::stdout().flush();
            }
            TimerEvent::SessionCompleted { .. } => {
                println!();
                println!("{}", Self::describe(event));
            }
            other => println!("{}", Self::describe(other)),
        }
    }

    /// One-line description of a non-tick event.
    pub fn describe(event: &TimerEvent) -> String {
        match event {
            TimerEvent::Started {
                mode,
                remaining_seconds,
            } => format!(
                "> {} started ({} left)",
                mode.label(),
                Self::format_time(*remaining_seconds)
            ),
            TimerEvent::Paused { remaining_seconds } => {
                format!("|| Paused at {}", Self::format_time(*remaining_seconds))
            }
            TimerEvent::Tick { remaining_seconds } => Self::format_time(*remaining_seconds),
            TimerEvent::SessionCompleted {
                mode: SessionMode::Work,
                completed_work_sessions,
            } => format!("* Pomodoro #{} complete!", completed_work_sessions),
            TimerEvent::SessionCompleted { mode, .. } => format!("* {} over!", mode.label()),
            TimerEvent::ModeChanged {
                mode,
                remaining_seconds,
                auto_started,
            } => format!(
                "-> {} ({}){}",
                mode.label(),
                Self::format_time(*remaining_seconds),
                if *auto_started { ", started automatically" } else { "" }
            ),
            TimerEvent::Reset {
                mode,
                remaining_seconds,
            } => format!(
                "[] {} reset to {}",
                mode.label(),
                Self::format_time(*remaining_seconds)
            ),
            TimerEvent::SettingsUpdated { settings } => format!(
                "Settings: work {}m, short break {}m, long break {}m, auto-start breaks {}, auto-start work {}",
                settings.work_minutes,
                settings.short_break_minutes,
                settings.long_break_minutes,
                Self::on_off(settings.auto_start_breaks),
                Self::on_off(settings.auto_start_work)
            ),
        }
    }

    /// Prints the session help text.
    pub fn show_help() {
        println!("Commands:");
        println!("  t, toggle, start, pause   start or pause the countdown");
        println!("  r, reset                  refill the current countdown");
        println!("  w, work                   switch to Pomodoro");
        println!("  s, short                  switch to Short Break");
        println!("  l, long                   switch to Long Break");
        println!("  set <field> <value>       fields: work, short, long, auto-breaks, auto-work");
        println!("  ?, status                 show status");
        println!("  h, help                   show this help");
        println!("  q, quit                   exit");
    }

    /// Prints warnings for clamped settings.
    pub fn show_clamps(clamps: &[Clamped]) {
        for clamp in clamps {
            eprintln!(
                "warning: {} {} is out of range, using {}",
                clamp.field, clamp.requested, clamp.applied
            );
        }
    }

    /// Prints the configuration as pretty JSON.
    pub fn show_config(config: &AppConfig) -> serde_json::Result<()> {
        println!("{}", serde_json::to_string_pretty(config)?);
        Ok(())
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("error: {}", message);
    }

    /// Formats seconds as zero-padded `mm:ss`.
    pub fn format_time(total_seconds: u32) -> String {
        format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
    }

    /// Renders `fraction` (clamped to `[0, 1]`) as a bar `width` cells wide.
    pub fn progress_bar(fraction: f64, width: usize) -> String {
        let filled = (fraction.clamp(0.0, 1.0) * width as f64).round() as usize;
        format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
    }

    /// Mode selector line with the active mode bracketed.
    fn mode_tabs(active: SessionMode) -> String {
        SessionMode::ALL
            .iter()
            .map(|mode| {
                if *mode == active {
                    format!("[{}]", mode.label())
                } else {
                    format!(" {} ", mode.label())
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn on_off(flag: bool) -> &'static str {
        if flag {
            "on"
        } else {
            "off"
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TimerSettings;

    // ------------------------------------------------------------------------
    // Format Time Tests
    // ------------------------------------------------------------------------

    mod format_time_tests {
        use super::*;

        #[test]
        fn test_format_time_zero() {
            assert_eq!(Display::format_time(0), "00:00");
        }

        #[test]
        fn test_format_time_seconds_only() {
            assert_eq!(Display::format_time(45), "00:45");
        }

        #[test]
        fn test_format_time_25_minutes() {
            assert_eq!(Display::format_time(25 * 60), "25:00");
        }

        #[test]
        fn test_format_time_large() {
            assert_eq!(Display::format_time(120 * 60), "120:00");
        }
    }

    // ------------------------------------------------------------------------
    // Progress Bar Tests
    // ------------------------------------------------------------------------

    mod progress_bar_tests {
        use super::*;

        #[test]
        fn test_empty_and_full() {
            assert_eq!(Display::progress_bar(0.0, 4), "[----]");
            assert_eq!(Display::progress_bar(1.0, 4), "[####]");
        }

        #[test]
        fn test_half() {
            assert_eq!(Display::progress_bar(0.5, 10), "[#####-----]");
        }

        #[test]
        fn test_out_of_range_is_clamped() {
            assert_eq!(Display::progress_bar(-1.0, 3), "[---]");
            assert_eq!(Display::progress_bar(7.0, 3), "[###]");
        }
    }

    // ------------------------------------------------------------------------
    // Event Description Tests
    // ------------------------------------------------------------------------

    mod describe_tests {
        use super::*;

        #[test]
        fn test_describe_work_completed() {
            let event = TimerEvent::SessionCompleted {
                mode: SessionMode::Work,
                completed_work_sessions: 4,
            };
            assert_eq!(Display::describe(&event), "* Pomodoro #4 complete!");
        }

        #[test]
        fn test_describe_break_completed() {
            let event = TimerEvent::SessionCompleted {
                mode: SessionMode::ShortBreak,
                completed_work_sessions: 1,
            };
            assert_eq!(Display::describe(&event), "* Short Break over!");
        }

        #[test]
        fn test_describe_mode_changed_auto() {
            let event = TimerEvent::ModeChanged {
                mode: SessionMode::LongBreak,
                remaining_seconds: 900,
                auto_started: true,
            };
            assert_eq!(
                Display::describe(&event),
                "-> Long Break (15:00), started automatically"
            );
        }

        #[test]
        fn test_describe_settings() {
            let event = TimerEvent::SettingsUpdated {
                settings: TimerSettings::default(),
            };
            let text = Display::describe(&event);
            assert!(text.contains("work 25m"));
            assert!(text.contains("auto-start breaks off"));
        }

        #[test]
        fn test_mode_tabs_marks_active() {
            assert_eq!(
                Display::mode_tabs(SessionMode::ShortBreak),
                " Pomodoro  [Short Break]  Long Break "
            );
        }
    }
}
