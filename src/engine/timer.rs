//! Timer engine for the study timer.
//!
//! This module provides the core state machine:
//! - Mode transitions (Work → ShortBreak ... → LongBreak after every 4th work session)
//! - One-second countdown steps gated by a [`ClockToken`]
//! - Completion notification and auto-continue flags
//! - Manual mode selection, start/pause, reset and settings updates
//!
//! The engine never sleeps. Something else (normally a
//! [`TimerController`](super::TimerController)) calls [`TimerEngine::tick`]
//! once per second with the token of the armed schedule.

use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::notify::{Completion, NotificationSink};
use crate::types::{Clamped, SessionMode, SettingsPatch, TimerSettings, TimerState};

use super::clock::{ClockToken, CountdownClock};

// ============================================================================
// TimerEvent
// ============================================================================

/// Events published for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// Countdown started or resumed
    Started {
        /// Active mode
        mode: SessionMode,
        /// Seconds left when starting
        remaining_seconds: u32,
    },
    /// Countdown paused
    Paused {
        /// Seconds left when pausing
        remaining_seconds: u32,
    },
    /// One second elapsed
    Tick {
        /// Remaining seconds
        remaining_seconds: u32,
    },
    /// A countdown reached zero
    SessionCompleted {
        /// Mode that finished
        mode: SessionMode,
        /// Work sessions completed so far
        completed_work_sessions: u32,
    },
    /// A new mode was entered
    ModeChanged {
        /// Mode entered
        mode: SessionMode,
        /// Full countdown of the new mode
        remaining_seconds: u32,
        /// Whether the countdown started by itself
        auto_started: bool,
    },
    /// Countdown of the active mode was refilled
    Reset {
        /// Active mode
        mode: SessionMode,
        /// Full countdown of the mode
        remaining_seconds: u32,
    },
    /// Settings changed
    SettingsUpdated {
        /// Settings after the update
        settings: TimerSettings,
    },
}

// ============================================================================
// TickOutcome
// ============================================================================

/// Result of presenting a tick to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The token no longer matches the armed schedule; nothing changed.
    Stale,
    /// One second elapsed and the countdown continues.
    Ticked {
        /// Remaining seconds
        remaining_seconds: u32,
    },
    /// The countdown hit zero and the next mode was entered.
    Completed {
        /// Mode entered after the transition
        next_mode: SessionMode,
        /// Token of the new schedule if the next mode auto-started
        next_token: Option<ClockToken>,
    },
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Pomodoro state machine plus countdown clock.
pub struct TimerEngine {
    settings: TimerSettings,
    state: TimerState,
    clock: CountdownClock,
    notifier: Box<dyn NotificationSink>,
    event_tx: Option<mpsc::UnboundedSender<TimerEvent>>,
}

impl TimerEngine {
    /// Creates an idle engine in work mode.
    ///
    /// Durations in `settings` are clamped into their bounds.
    pub fn new(settings: TimerSettings, notifier: impl NotificationSink + 'static) -> Self {
        let settings = settings.clamped();
        Self {
            state: TimerState::new(&settings),
            settings,
            clock: CountdownClock::new(),
            notifier: Box::new(notifier),
            event_tx: None,
        }
    }

    /// Publishes [`TimerEvent`]s on `event_tx` from now on.
    #[must_use]
    pub fn with_events(mut self, event_tx: mpsc::UnboundedSender<TimerEvent>) -> Self {
        self.event_tx = Some(event_tx);
        self
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Returns the current timer state.
    pub fn state(&self) -> &TimerState {
        &self.state
    }

    /// Returns the current settings.
    pub fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    /// Elapsed fraction of the active countdown, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.state.progress()
    }

    /// Token of the armed tick schedule, if the timer is running.
    pub fn clock_token(&self) -> Option<ClockToken> {
        self.clock.token()
    }

    /// Generation of the clock; changes whenever a schedule is armed or cancelled.
    pub fn clock_generation(&self) -> u64 {
        self.clock.generation()
    }

    // ------------------------------------------------------------------------
    // Manual operations
    // ------------------------------------------------------------------------

    /// Switches to `mode` immediately, cancelling any running countdown.
    ///
    /// The work-session counter is not touched.
    pub fn select_mode(&mut self, mode: SessionMode) {
        self.clock.stop();
        self.state.enter_mode(mode, &self.settings);
        info!(mode = mode.as_str(), "Mode selected");
        self.emit(TimerEvent::ModeChanged {
            mode,
            remaining_seconds: self.state.remaining_seconds,
            auto_started: false,
        });
    }

    /// Starts a paused countdown or pauses a running one.
    ///
    /// Starting with nothing left on the clock does nothing.
    pub fn toggle_running(&mut self) {
        if self.state.is_running {
            self.pause();
        } else {
            self.start();
        }
    }

    /// Starts the countdown. No-op if running or at zero.
    pub fn start(&mut self) {
        if self.state.is_running || self.state.remaining_seconds == 0 {
            debug!(
                remaining = self.state.remaining_seconds,
                "Start ignored"
            );
            return;
        }
        self.clock.start();
        self.state.is_running = true;
        self.emit(TimerEvent::Started {
            mode: self.state.mode,
            remaining_seconds: self.state.remaining_seconds,
        });
    }

    /// Pauses the countdown. No-op if not running.
    pub fn pause(&mut self) {
        if !self.state.is_running {
            return;
        }
        self.clock.stop();
        self.state.is_running = false;
        self.emit(TimerEvent::Paused {
            remaining_seconds: self.state.remaining_seconds,
        });
    }

    /// Stops the countdown and refills it for the current mode.
    pub fn reset(&mut self) {
        self.clock.stop();
        self.state.rewind(&self.settings);
        self.emit(TimerEvent::Reset {
            mode: self.state.mode,
            remaining_seconds: self.state.remaining_seconds,
        });
    }

    /// Merges `patch` into the settings, clamping out-of-range durations.
    ///
    /// While idle the active countdown is refilled with the new duration.
    /// While running the countdown is left alone; new durations apply from
    /// the next mode entry.
    pub fn update_settings(&mut self, patch: &SettingsPatch) -> Vec<Clamped> {
        let clamps = patch.apply_to(&mut self.settings);
        for clamp in &clamps {
            warn!(
                "{} {} out of range, using {}",
                clamp.field, clamp.requested, clamp.applied
            );
        }

        if !self.state.is_running {
            self.state.rewind(&self.settings);
        }

        info!(running = self.state.is_running, "Settings updated");
        self.emit(TimerEvent::SettingsUpdated {
            settings: self.settings.clone(),
        });
        clamps
    }

    // ------------------------------------------------------------------------
    // Countdown
    // ------------------------------------------------------------------------

    /// Advances the countdown by one second on behalf of the schedule `token`.
    pub fn tick(&mut self, token: ClockToken) -> TickOutcome {
        if !self.clock.accepts(token) {
            trace!(generation = token.generation(), "Stale tick ignored");
            return TickOutcome::Stale;
        }

        if !self.state.tick() {
            self.emit(TimerEvent::Tick {
                remaining_seconds: self.state.remaining_seconds,
            });
            return TickOutcome::Ticked {
                remaining_seconds: self.state.remaining_seconds,
            };
        }

        // Zero-crossing: the clock stops before anything else happens.
        self.clock.stop();
        self.emit(TimerEvent::Tick {
            remaining_seconds: 0,
        });
        self.handle_timer_complete()
    }

    /// Runs the mode transition after a zero-crossing.
    fn handle_timer_complete(&mut self) -> TickOutcome {
        let finished = self.state.mode;
        if finished == SessionMode::Work {
            self.state.completed_work_sessions += 1;
        }

        let completion = Completion {
            mode: finished,
            completed_work_sessions: self.state.completed_work_sessions,
        };
        if let Err(e) = self.notifier.notify(&completion) {
            warn!("Completion notification failed: {}", e);
        }
        self.emit(TimerEvent::SessionCompleted {
            mode: finished,
            completed_work_sessions: self.state.completed_work_sessions,
        });

        let next_mode = finished.next_after(self.state.completed_work_sessions);
        let auto_start = self.settings.auto_start_after(finished);
        self.state.enter_mode(next_mode, &self.settings);

        let next_token = if auto_start {
            self.state.is_running = true;
            self.clock.start()
        } else {
            None
        };

        info!(
            from = finished.as_str(),
            to = next_mode.as_str(),
            completed = self.state.completed_work_sessions,
            auto_start,
            "Session completed"
        );
        self.emit(TimerEvent::ModeChanged {
            mode: next_mode,
            remaining_seconds: self.state.remaining_seconds,
            auto_started: auto_start,
        });

        TickOutcome::Completed {
            next_mode,
            next_token,
        }
    }

    fn emit(&self, event: TimerEvent) {
        if let Some(tx) = &self.event_tx {
            if tx.send(event).is_err() {
                trace!("Event receiver dropped");
            }
        }
    }

    /// Returns a mutable reference to the timer state (for testing).
    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut TimerState {
        &mut self.state
    }
}

impl std::fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEngine")
            .field("settings", &self.settings)
            .field("state", &self.state)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
