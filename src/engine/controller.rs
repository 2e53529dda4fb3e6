//! Async handle that drives a [`TimerEngine`] in real time.
//!
//! The controller owns at most one ticker task. Every manual operation
//! compares the clock generation before and after it runs; a change means
//! the armed schedule was cancelled or replaced, so the old ticker is
//! aborted and, if the clock is armed again, a fresh one is spawned with
//! the new token.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

use crate::types::{Clamped, SessionMode, SettingsPatch, TimerSettings, TimerState};

use super::clock::ClockToken;
use super::timer::{TickOutcome, TimerEngine};

/// Default time between ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Point-in-time copy of everything a view needs.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerSnapshot {
    pub state: TimerState,
    pub settings: TimerSettings,
    pub progress: f64,
}

/// Cloneable handle to a shared [`TimerEngine`].
#[derive(Clone)]
pub struct TimerController {
    engine: Arc<Mutex<TimerEngine>>,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    tick_period: Duration,
}

impl TimerController {
    /// Wraps `engine` with the default one-second tick period.
    pub fn new(engine: TimerEngine) -> Self {
        Self::with_tick_period(engine, TICK_PERIOD)
    }

    /// Wraps `engine` with a custom tick period.
    pub fn with_tick_period(engine: TimerEngine, tick_period: Duration) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            ticker: Arc::new(Mutex::new(None)),
            tick_period,
        }
    }

    /// Switches mode, cancelling any running countdown.
    pub async fn select_mode(&self, mode: SessionMode) {
        self.apply(|engine| engine.select_mode(mode)).await;
    }

    /// Starts or pauses the countdown.
    pub async fn toggle_running(&self) {
        self.apply(TimerEngine::toggle_running).await;
    }

    /// Stops and refills the countdown of the current mode.
    pub async fn reset(&self) {
        self.apply(TimerEngine::reset).await;
    }

    /// Merges a settings patch; see [`TimerEngine::update_settings`].
    pub async fn update_settings(&self, patch: SettingsPatch) -> Vec<Clamped> {
        self.apply(|engine| engine.update_settings(&patch)).await
    }

    /// Current timer state.
    pub async fn state(&self) -> TimerState {
        self.engine.lock().await.state().clone()
    }

    /// Current settings.
    pub async fn settings(&self) -> TimerSettings {
        self.engine.lock().await.settings().clone()
    }

    /// Elapsed fraction of the active countdown.
    pub async fn progress(&self) -> f64 {
        self.engine.lock().await.progress()
    }

    /// State, settings and progress read under a single lock.
    pub async fn snapshot(&self) -> TimerSnapshot {
        let engine = self.engine.lock().await;
        TimerSnapshot {
            state: engine.state().clone(),
            settings: engine.settings().clone(),
            progress: engine.progress(),
        }
    }

    /// Stops the ticker task without touching the timer state.
    pub async fn shutdown(&self) {
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
        }
    }

    /// Runs `op` on the engine and reschedules the ticker if the clock moved.
    async fn apply<R>(&self, op: impl FnOnce(&mut TimerEngine) -> R) -> R {
        let mut ticker = self.ticker.lock().await;
        let (result, reschedule) = {
            let mut engine = self.engine.lock().await;
            let before = engine.clock_generation();
            let result = op(&mut *engine);
            let reschedule = (engine.clock_generation() != before).then(|| engine.clock_token());
            (result, reschedule)
        };

        if let Some(token) = reschedule {
            if let Some(handle) = ticker.take() {
                handle.abort();
            }
            if let Some(token) = token {
                *ticker = Some(self.spawn_ticker(token));
            }
        }
        result
    }

    fn spawn_ticker(&self, token: ClockToken) -> JoinHandle<()> {
        debug!(generation = token.generation(), "Spawning ticker");
        let engine = Arc::clone(&self.engine);
        let period = self.tick_period;

        tokio::spawn(async move {
            let mut token = token;
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;

                let outcome = engine.lock().await.tick(token);
                match outcome {
                    TickOutcome::Ticked { .. } => {}
                    TickOutcome::Completed {
                        next_token: Some(next),
                        ..
                    } => {
                        // Auto-continue: same task, new schedule, full first second.
                        token = next;
                        interval.reset();
                    }
                    TickOutcome::Completed {
                        next_token: None, ..
                    }
                    | TickOutcome::Stale => break,
                }
            }
            debug!("Ticker finished");
        })
    }
}

impl std::fmt::Debug for TimerController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerController")
            .field("tick_period", &self.tick_period)
            .finish_non_exhaustive()
    }
}
