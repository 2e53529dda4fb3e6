//! Sound player implementation using rodio.
//!
//! `RodioSoundPlayer` owns a rodio output stream, which is not `Send`.
//! Create it on the thread that will use it; [`SoundNotifier`] does this
//! on its own audio thread.
//!
//! [`SoundNotifier`]: super::SoundNotifier

use std::fs::File;
use std::io::BufReader;
use std::time::Duration;

use rodio::source::{SineWave, Source};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, warn};

use super::error::SoundError;
use super::source::SoundSource;

/// Frequencies of the two chime tones, in Hz.
const CHIME_TONES: [f32; 2] = [880.0, 1318.5];

/// Length of each chime tone.
const CHIME_TONE_DURATION: Duration = Duration::from_millis(220);

/// Chime volume relative to full scale.
const CHIME_VOLUME: f32 = 0.2;

/// A sound player that uses rodio for audio playback.
///
/// Playback is non-blocking; sounds continue playing in the background.
pub struct RodioSoundPlayer {
    /// The audio output stream (must be kept alive for playback).
    _stream: OutputStream,
    /// Handle to the output stream for creating sinks.
    stream_handle: OutputStreamHandle,
}

impl RodioSoundPlayer {
    /// Creates a new sound player on the default output device.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new() -> Result<Self, SoundError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        debug!("Audio output stream initialized");

        Ok(Self {
            _stream: stream,
            stream_handle,
        })
    }

    /// Plays a sound from the given source.
    ///
    /// A file that cannot be opened or decoded falls back to the chime.
    ///
    /// # Errors
    ///
    /// Returns an error if the output sink cannot be created.
    pub fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        match source {
            SoundSource::File { path, name } => {
                debug!("Playing sound file: {}", name);
                match self.play_file(path) {
                    Ok(()) => Ok(()),
                    Err(e) if e.should_fallback_to_chime() => {
                        warn!("Failed to play '{}': {}, falling back to chime", name, e);
                        self.play_chime()
                    }
                    Err(e) => Err(e),
                }
            }
            SoundSource::Chime => {
                debug!("Playing chime");
                self.play_chime()
            }
        }
    }

    fn play_file(&self, path: &std::path::Path) -> Result<(), SoundError> {
        let file = File::open(path)
            .map_err(|e| SoundError::FileNotFound(format!("{}: {}", path.display(), e)))?;

        let decoder = Decoder::new(BufReader::new(file))
            .map_err(|e| SoundError::DecodeError(e.to_string()))?;

        let sink = self.new_sink()?;
        sink.append(decoder);
        sink.detach();
        Ok(())
    }

    fn play_chime(&self) -> Result<(), SoundError> {
        let sink = self.new_sink()?;
        for freq in CHIME_TONES {
            sink.append(
                SineWave::new(freq)
                    .take_duration(CHIME_TONE_DURATION)
                    .amplify(CHIME_VOLUME),
            );
        }
        sink.detach(); // keep playing after we return
        Ok(())
    }

    fn new_sink(&self) -> Result<Sink, SoundError> {
        Sink::try_new(&self.stream_handle).map_err(|e| SoundError::StreamError(e.to_string()))
    }
}

impl std::fmt::Debug for RodioSoundPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioSoundPlayer").finish_non_exhaustive()
    }
}
