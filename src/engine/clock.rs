//! Countdown clock bookkeeping.
//!
//! The clock does not sleep by itself. It records whether a tick schedule
//! is armed and hands out a [`ClockToken`] for it; whoever drives the ticks
//! presents the token back, and ticks from a cancelled schedule are refused.

use tracing::debug;

/// Identifies one tick schedule of a [`CountdownClock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClockToken {
    generation: u64,
}

impl ClockToken {
    /// Generation number captured when the schedule was armed.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Owns at most one armed tick schedule at a time.
#[derive(Debug, Default)]
pub struct CountdownClock {
    generation: u64,
    armed: bool,
}

impl CountdownClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a new schedule.
    ///
    /// Returns `None` if a schedule is already armed.
    pub fn start(&mut self) -> Option<ClockToken> {
        if self.armed {
            return None;
        }
        self.generation += 1;
        self.armed = true;
        debug!(generation = self.generation, "clock armed");
        Some(ClockToken {
            generation: self.generation,
        })
    }

    /// Disarms the clock and invalidates every token handed out so far.
    ///
    /// Returns true if a schedule was armed.
    pub fn stop(&mut self) -> bool {
        if !self.armed {
            return false;
        }
        self.armed = false;
        self.generation += 1;
        debug!(generation = self.generation, "clock disarmed");
        true
    }

    /// Returns true while a schedule is armed.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Token of the armed schedule, if any.
    pub fn token(&self) -> Option<ClockToken> {
        self.armed.then_some(ClockToken {
            generation: self.generation,
        })
    }

    /// Returns true if `token` belongs to the armed schedule.
    pub fn accepts(&self, token: ClockToken) -> bool {
        self.armed && token.generation == self.generation
    }

    /// Monotonic counter bumped on every start and stop.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
