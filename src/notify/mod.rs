//! Completion notifications.
//!
//! The timer engine calls a [`NotificationSink`] exactly once each time a
//! countdown reaches zero. Sinks are best-effort: a failing sink is logged
//! and never interferes with the mode transition.
//!
//! Provided sinks:
//! - [`LogNotifier`]: writes a line through `tracing`
//! - [`SoundNotifier`](crate::sound::SoundNotifier): plays a sound on a
//!   dedicated audio thread
//! - [`FallbackNotifier`]: tries one sink, then another
//! - [`MockNotifier`]: records calls for tests

mod error;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

pub use self::error::NotifyError;

use crate::types::SessionMode;

/// Describes the countdown that just finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    /// Mode whose countdown reached zero
    pub mode: SessionMode,
    /// Work sessions completed, including this one if it was a work session
    pub completed_work_sessions: u32,
}

impl Completion {
    /// One-line human summary.
    pub fn summary(&self) -> String {
        match self.mode {
            SessionMode::Work => format!(
                "Pomodoro #{} complete, time for a break",
                self.completed_work_sessions
            ),
            SessionMode::ShortBreak | SessionMode::LongBreak => {
                format!("{} over, back to work", self.mode.label())
            }
        }
    }
}

/// Receives zero-crossing notifications from the timer engine.
pub trait NotificationSink: Send {
    /// Announces a finished countdown.
    ///
    /// Implementations must not block for long; the engine calls this
    /// while holding its own state.
    fn notify(&self, completion: &Completion) -> Result<(), NotifyError>;
}

impl<T: NotificationSink + Sync> NotificationSink for Arc<T> {
    fn notify(&self, completion: &Completion) -> Result<(), NotifyError> {
        (**self).notify(completion)
    }
}

impl NotificationSink for Box<dyn NotificationSink> {
    fn notify(&self, completion: &Completion) -> Result<(), NotifyError> {
        (**self).notify(completion)
    }
}

// ============================================================================
// LogNotifier
// ============================================================================

/// Logs completions at `info` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    fn notify(&self, completion: &Completion) -> Result<(), NotifyError> {
        info!(mode = completion.mode.as_str(), "Timer completed! {}", completion.summary());
        Ok(())
    }
}

// ============================================================================
// FallbackNotifier
// ============================================================================

/// Delegates to `primary`, falling back to `fallback` when it fails.
pub struct FallbackNotifier<P, F> {
    primary: P,
    fallback: F,
}

impl<P, F> FallbackNotifier<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P, F> NotificationSink for FallbackNotifier<P, F>
where
    P: NotificationSink,
    F: NotificationSink,
{
    fn notify(&self, completion: &Completion) -> Result<(), NotifyError> {
        match self.primary.notify(completion) {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(
                    permanent = e.is_permanent(),
                    "Primary notification failed: {}, falling back", e
                );
                self.fallback.notify(completion)
            }
        }
    }
}

// ============================================================================
// MockNotifier
// ============================================================================

/// Mock sink for testing.
#[derive(Debug, Default)]
pub struct MockNotifier {
    calls: Mutex<Vec<Completion>>,
    should_fail: AtomicBool,
}

impl MockNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock that fails every call (after recording it).
    #[must_use]
    pub fn failing() -> Self {
        let mock = Self::new();
        mock.set_should_fail(true);
        mock
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn notify_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    #[must_use]
    pub fn get_calls(&self) -> Vec<Completion> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl NotificationSink for MockNotifier {
    fn notify(&self, completion: &Completion) -> Result<(), NotifyError> {
        self.calls.lock().unwrap().push(*completion);
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(NotifyError::Failed("Mock failure".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn work_done(count: u32) -> Completion {
        Completion {
            mode: SessionMode::Work,
            completed_work_sessions: count,
        }
    }

    #[test]
    fn test_summary() {
        assert_eq!(
            work_done(3).summary(),
            "Pomodoro #3 complete, time for a break"
        );
        let long = Completion {
            mode: SessionMode::LongBreak,
            completed_work_sessions: 4,
        };
        assert_eq!(long.summary(), "Long Break over, back to work");
    }

    #[test]
    fn test_log_notifier_never_fails() {
        assert!(LogNotifier.notify(&work_done(1)).is_ok());
    }

    #[test]
    fn test_mock_records_calls() {
        let mock = MockNotifier::new();
        mock.notify(&work_done(1)).unwrap();
        mock.notify(&work_done(2)).unwrap();

        assert_eq!(mock.notify_count(), 2);
        assert_eq!(mock.get_calls()[1], work_done(2));

        mock.clear_calls();
        assert_eq!(mock.notify_count(), 0);
    }

    #[test]
    fn test_mock_failure() {
        let mock = MockNotifier::failing();
        assert!(mock.notify(&work_done(1)).is_err());
        assert_eq!(mock.notify_count(), 1);
    }

    #[test]
    fn test_fallback_used_on_primary_failure() {
        let primary = Arc::new(MockNotifier::failing());
        let fallback = Arc::new(MockNotifier::new());
        let sink = FallbackNotifier::new(primary.clone(), fallback.clone());

        assert!(sink.notify(&work_done(1)).is_ok());
        assert_eq!(primary.notify_count(), 1);
        assert_eq!(fallback.notify_count(), 1);
    }

    #[test]
    fn test_fallback_skipped_on_primary_success() {
        let primary = Arc::new(MockNotifier::new());
        let fallback = Arc::new(MockNotifier::new());
        let sink = FallbackNotifier::new(primary.clone(), fallback.clone());

        sink.notify(&work_done(1)).unwrap();
        assert_eq!(primary.notify_count(), 1);
        assert_eq!(fallback.notify_count(), 0);
    }

    #[test]
    fn test_arc_and_box_forwarding() {
        let mock = Arc::new(MockNotifier::new());
        let boxed: Box<dyn NotificationSink> = Box::new(mock.clone());
        boxed.notify(&work_done(1)).unwrap();
        assert_eq!(mock.notify_count(), 1);
    }
}
