//! Sound-playing notification sink.

use std::thread;

use crossbeam_channel::{bounded, unbounded, Sender};
use tracing::{debug, warn};

use super::error::SoundError;
use super::player::RodioSoundPlayer;
use super::source::SoundSource;
use super::SoundPlayer;
use crate::notify::{Completion, NotificationSink, NotifyError};

/// Plays a sound for every completion.
///
/// The player lives on its own thread because rodio's output stream is not
/// `Send`. `notify` only enqueues a request, so it never blocks the timer.
#[derive(Debug)]
pub struct SoundNotifier {
    source: SoundSource,
    request_tx: Sender<SoundSource>,
}

impl SoundNotifier {
    /// Starts the audio thread with a rodio player on the default device.
    ///
    /// # Errors
    ///
    /// Returns the player's initialization error, e.g. when no output
    /// device exists.
    pub fn spawn(source: SoundSource) -> Result<Self, SoundError> {
        Self::spawn_with(source, RodioSoundPlayer::new)
    }

    /// Starts the audio thread with a player built by `make_player`.
    ///
    /// `make_player` runs on the audio thread.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `make_player`.
    pub fn spawn_with<P, F>(source: SoundSource, make_player: F) -> Result<Self, SoundError>
    where
        P: SoundPlayer + 'static,
        F: FnOnce() -> Result<P, SoundError> + Send + 'static,
    {
        let (request_tx, request_rx) = unbounded::<SoundSource>();
        let (ready_tx, ready_rx) = bounded::<Result<(), SoundError>>(1);

        thread::Builder::new()
            .name("study-timer-audio".to_string())
            .spawn(move || {
                let player = match make_player() {
                    Ok(player) => {
                        let _ = ready_tx.send(Ok(()));
                        player
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };

                for source in request_rx {
                    if let Err(e) = player.play(&source) {
                        warn!("Failed to play completion sound: {}", e);
                    }
                }
                debug!("Audio thread exiting");
            })
            .map_err(|e| SoundError::PlaybackError(format!("failed to start audio thread: {}", e)))?;

        ready_rx
            .recv()
            .map_err(|_| SoundError::PlaybackError("audio thread exited during startup".to_string()))??;

        Ok(Self { source, request_tx })
    }
}

impl NotificationSink for SoundNotifier {
    fn notify(&self, completion: &Completion) -> Result<(), NotifyError> {
        debug!(mode = completion.mode.as_str(), "Queueing completion sound");
        self.request_tx
            .send(self.source.clone())
            .map_err(|_| NotifyError::Unavailable("audio thread has stopped".to_string()))
    }
}
