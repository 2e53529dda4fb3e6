//! Notification sink error types.

use thiserror::Error;

use crate::sound::SoundError;

/// Errors a notification sink may report.
///
/// The timer engine logs these and carries on; none of them is fatal.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Sound playback failed.
    #[error("sound notification failed: {0}")]
    Sound(#[from] SoundError),

    /// The sink's backend has shut down.
    #[error("notification backend is not available: {0}")]
    Unavailable(String),

    /// Generic delivery failure.
    #[error("notification failed: {0}")]
    Failed(String),
}

impl NotifyError {
    /// Returns true if retrying later cannot succeed.
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        match self {
            Self::Unavailable(_) => true,
            Self::Sound(e) => e.is_device_error(),
            Self::Failed(_) => false,
        }
    }
}
