//! Integration tests for the timer engine and controller.
//!
//! These tests drive the public API only:
//! - Mode entry durations and the long-break cadence
//! - Toggle, reset and settings-update behavior
//! - Exactly-once completion under repeated and stale ticks
//! - Real-time ticking through `TimerController` with paused tokio time

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};

use study_timer::{
    MockNotifier, SessionMode, SettingsPatch, TickOutcome, TimerController, TimerEngine,
    TimerEvent, TimerSettings,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn one_minute_settings() -> TimerSettings {
    TimerSettings {
        work_minutes: 1,
        short_break_minutes: 1,
        long_break_minutes: 1,
        ..TimerSettings::default()
    }
}

fn create_engine(settings: TimerSettings) -> (TimerEngine, Arc<MockNotifier>) {
    let notifier = Arc::new(MockNotifier::new());
    let engine = TimerEngine::new(settings, Arc::clone(&notifier));
    (engine, notifier)
}

/// Starts the engine and ticks until the running countdown completes.
///
/// Returns the number of ticks delivered.
fn run_to_completion(engine: &mut TimerEngine) -> u32 {
    if !engine.state().is_running {
        engine.toggle_running();
    }
    let token = engine.clock_token().expect("clock should be armed");
    let mut ticks = 0;
    loop {
        ticks += 1;
        if let TickOutcome::Completed { .. } = engine.tick(token) {
            return ticks;
        }
    }
}

fn drain(rx: &mut mpsc::UnboundedReceiver<TimerEvent>) -> Vec<TimerEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

// ============================================================================
// Mode Entry
// ============================================================================

#[test]
fn test_entering_mode_fills_full_duration() {
    let settings = TimerSettings {
        work_minutes: 50,
        short_break_minutes: 10,
        long_break_minutes: 30,
        ..TimerSettings::default()
    };
    let (mut engine, _) = create_engine(settings.clone());

    for mode in SessionMode::ALL {
        engine.select_mode(mode);
        assert_eq!(
            engine.state().remaining_seconds,
            settings.minutes(mode) * 60,
            "mode {}",
            mode
        );
        assert_eq!(engine.progress(), 0.0);
    }
}

#[test]
fn test_four_work_cycles_end_in_long_break() {
    let (mut engine, notifier) = create_engine(one_minute_settings());
    let mut sequence = vec![engine.state().mode];

    while sequence.len() < 8 {
        run_to_completion(&mut engine);
        sequence.push(engine.state().mode);
    }

    assert_eq!(
        sequence,
        vec![
            SessionMode::Work,
            SessionMode::ShortBreak,
            SessionMode::Work,
            SessionMode::ShortBreak,
            SessionMode::Work,
            SessionMode::ShortBreak,
            SessionMode::Work,
            SessionMode::LongBreak,
        ]
    );
    assert_eq!(engine.state().completed_work_sessions, 4);
    assert_eq!(notifier.notify_count(), 7);
}

#[test]
fn test_sixty_ticks_complete_one_minute_work() {
    let (mut engine, notifier) = create_engine(one_minute_settings());

    let ticks = run_to_completion(&mut engine);

    let state = engine.state();
    assert_eq!(ticks, 60);
    assert_eq!(state.mode, SessionMode::ShortBreak);
    assert_eq!(state.remaining_seconds, 60);
    assert_eq!(state.completed_work_sessions, 1);
    assert!(!state.is_running);
    assert_eq!(notifier.get_calls()[0].mode, SessionMode::Work);
}

#[test]
fn test_sixty_ticks_with_auto_start_breaks() {
    let (mut engine, _) = create_engine(TimerSettings {
        auto_start_breaks: true,
        ..one_minute_settings()
    });

    run_to_completion(&mut engine);

    assert_eq!(engine.state().mode, SessionMode::ShortBreak);
    assert!(engine.state().is_running);
    assert!(engine.clock_token().is_some());
}

// ============================================================================
// Manual Operations
// ============================================================================

#[test]
fn test_double_toggle_is_identity() {
    let (mut engine, _) = create_engine(TimerSettings::default());
    let before = engine.state().clone();

    engine.toggle_running();
    engine.toggle_running();

    assert_eq!(engine.state(), &before);
}

#[test]
fn test_reset_keeps_mode_and_counter() {
    let (mut engine, _) = create_engine(one_minute_settings());
    run_to_completion(&mut engine);
    engine.toggle_running();
    let token = engine.clock_token().unwrap();
    engine.tick(token);
    engine.tick(token);

    engine.reset();

    let state = engine.state();
    assert_eq!(state.mode, SessionMode::ShortBreak);
    assert_eq!(state.completed_work_sessions, 1);
    assert_eq!(state.remaining_seconds, 60);
    assert!(!state.is_running);
}

#[test]
fn test_update_settings_idle_refills_countdown() {
    let (mut engine, _) = create_engine(TimerSettings::default());

    let clamps = engine.update_settings(&SettingsPatch::default().with_work_minutes(30));

    assert!(clamps.is_empty());
    assert_eq!(engine.state().remaining_seconds, 1800);
}

#[test]
fn test_update_settings_running_leaves_countdown() {
    let (mut engine, _) = create_engine(TimerSettings::default());
    engine.toggle_running();
    let token = engine.clock_token().unwrap();
    engine.tick(token);

    engine.update_settings(&SettingsPatch::default().with_work_minutes(30));

    assert_eq!(engine.state().remaining_seconds, 1499);
    assert_eq!(engine.settings().work_minutes, 30);
    // Schedule is untouched, so the same token still drives the countdown.
    assert!(matches!(
        engine.tick(token),
        TickOutcome::Ticked {
            remaining_seconds: 1498
        }
    ));
}

#[test]
fn test_out_of_range_update_is_clamped_and_reported() {
    let (mut engine, _) = create_engine(TimerSettings::default());

    let clamps = engine.update_settings(
        &SettingsPatch::default()
            .with_work_minutes(0)
            .with_long_break_minutes(90),
    );

    assert_eq!(clamps.len(), 2);
    assert_eq!(engine.settings().work_minutes, 1);
    assert_eq!(engine.settings().long_break_minutes, 60);
    assert_eq!(engine.state().remaining_seconds, 60);
}

// ============================================================================
// Exactly-Once Completion
// ============================================================================

#[test]
fn test_stale_ticks_after_completion_are_ignored() {
    let (mut engine, notifier) = create_engine(one_minute_settings());
    engine.toggle_running();
    let token = engine.clock_token().unwrap();
    for _ in 0..60 {
        engine.tick(token);
    }
    let after = engine.state().clone();

    for _ in 0..5 {
        assert!(matches!(engine.tick(token), TickOutcome::Stale));
    }

    assert_eq!(engine.state(), &after);
    assert_eq!(notifier.notify_count(), 1);
}

#[test]
fn test_failing_notifier_does_not_block_transition() {
    let notifier = Arc::new(MockNotifier::failing());
    let mut engine = TimerEngine::new(one_minute_settings(), Arc::clone(&notifier));

    run_to_completion(&mut engine);

    assert_eq!(engine.state().mode, SessionMode::ShortBreak);
    assert_eq!(notifier.notify_count(), 1);
}

#[test]
fn test_completion_event_order() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let (engine, _) = create_engine(one_minute_settings());
    let mut engine = engine.with_events(tx);

    run_to_completion(&mut engine);
    let events = drain(&mut rx);

    assert!(matches!(events.first(), Some(TimerEvent::Started { .. })));
    let tail: Vec<_> = events.iter().rev().take(3).rev().collect();
    assert!(matches!(
        tail[0],
        TimerEvent::Tick {
            remaining_seconds: 0
        }
    ));
    assert!(matches!(
        tail[1],
        TimerEvent::SessionCompleted {
            mode: SessionMode::Work,
            completed_work_sessions: 1
        }
    ));
    assert!(matches!(
        tail[2],
        TimerEvent::ModeChanged {
            mode: SessionMode::ShortBreak,
            remaining_seconds: 60,
            auto_started: false
        }
    ));
}

// ============================================================================
// Controller (paused time)
// ============================================================================

/// Sleeps `secs` seconds plus half a tick.
async fn advance_secs(secs: u64) {
    sleep(Duration::from_millis(secs * 1000 + 500)).await;
}

#[tokio::test(start_paused = true)]
async fn test_controller_full_auto_cycle() {
    let notifier = Arc::new(MockNotifier::new());
    let settings = TimerSettings {
        auto_start_breaks: true,
        auto_start_work: true,
        ..one_minute_settings()
    };
    let controller = TimerController::new(TimerEngine::new(settings, Arc::clone(&notifier)));

    controller.toggle_running().await;
    // Eight one-minute countdowns back to back.
    advance_secs(8 * 60).await;

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.state.completed_work_sessions, 4);
    assert_eq!(snapshot.state.mode, SessionMode::Work);
    assert!(snapshot.state.is_running);
    assert_eq!(notifier.notify_count(), 8);
    assert_eq!(
        notifier
            .get_calls()
            .iter()
            .filter(|c| c.mode == SessionMode::LongBreak)
            .count(),
        1
    );

    controller.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_controller_rapid_toggles_keep_one_schedule() {
    let notifier = Arc::new(MockNotifier::new());
    let controller =
        TimerController::new(TimerEngine::new(TimerSettings::default(), Arc::clone(&notifier)));

    for _ in 0..5 {
        controller.toggle_running().await;
        controller.toggle_running().await;
    }
    controller.toggle_running().await;
    advance_secs(10).await;

    assert_eq!(controller.state().await.remaining_seconds, 1500 - 10);
}

#[tokio::test(start_paused = true)]
async fn test_controller_emits_ticks() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let engine = TimerEngine::new(TimerSettings::default(), MockNotifier::new()).with_events(tx);
    let controller = TimerController::new(engine);

    controller.toggle_running().await;
    advance_secs(2).await;
    controller.toggle_running().await;

    let events = drain(&mut rx);
    assert_eq!(
        events,
        vec![
            TimerEvent::Started {
                mode: SessionMode::Work,
                remaining_seconds: 1500
            },
            TimerEvent::Tick {
                remaining_seconds: 1499
            },
            TimerEvent::Tick {
                remaining_seconds: 1498
            },
            TimerEvent::Paused {
                remaining_seconds: 1498
            },
        ]
    );
}
