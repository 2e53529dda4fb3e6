//! Sound source selection.
//!
//! A completion sound is either a user-supplied audio file or the chime
//! synthesized at playback time.

use std::path::{Path, PathBuf};

use super::error::SoundError;

/// Supported audio file extensions.
const SUPPORTED_EXTENSIONS: &[&str] = &["wav", "mp3", "flac", "ogg", "aiff"];

/// Represents the source of a sound to be played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundSource {
    /// An audio file on disk.
    File {
        /// Display name (the file stem).
        name: String,
        /// Full path to the file.
        path: PathBuf,
    },
    /// The built-in two-tone chime.
    Chime,
}

impl SoundSource {
    /// Creates a file source without touching the filesystem.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::File { name, path }
    }

    /// Creates a file source after checking the file exists and has a
    /// supported extension.
    ///
    /// # Errors
    ///
    /// Returns `FileNotFound` or `UnsupportedFormat`.
    pub fn file_validated(path: impl Into<PathBuf>) -> Result<Self, SoundError> {
        let path = path.into();
        validate_sound_file(&path)?;
        Ok(Self::file(path))
    }

    /// Returns the name of the sound source.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::File { name, .. } => name,
            Self::Chime => "chime",
        }
    }

    /// Returns the file path if this is a file source.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File { path, .. } => Some(path),
            Self::Chime => None,
        }
    }

    /// Returns true if this is the built-in chime.
    #[must_use]
    pub fn is_chime(&self) -> bool {
        matches!(self, Self::Chime)
    }
}

fn validate_sound_file(path: &Path) -> Result<(), SoundError> {
    if !path.is_file() {
        return Err(SoundError::FileNotFound(path.display().to_string()));
    }

    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(SoundError::UnsupportedFormat(format!(
            "'{}' (expected one of: {})",
            path.display(),
            SUPPORTED_EXTENSIONS.join(", ")
        )));
    }
    Ok(())
}

/// Picks the sound to play on completion.
///
/// Uses `configured` if it names a usable file, otherwise the chime.
#[must_use]
pub fn resolve_sound(configured: Option<&Path>) -> SoundSource {
    match configured {
        Some(path) => match SoundSource::file_validated(path) {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!("Ignoring configured sound: {}", e);
                SoundSource::Chime
            }
        },
        None => SoundSource::Chime,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_source_name_is_stem() {
        let source = SoundSource::file("/sounds/notification.mp3");
        assert_eq!(source.name(), "notification");
        assert_eq!(source.path(), Some(Path::new("/sounds/notification.mp3")));
        assert!(!source.is_chime());
    }

    #[test]
    fn test_chime_source() {
        let source = SoundSource::Chime;
        assert!(source.is_chime());
        assert_eq!(source.name(), "chime");
        assert!(source.path().is_none());
    }

    #[test]
    fn test_file_validated_missing_file() {
        let result = SoundSource::file_validated("/nonexistent/notification.mp3");
        assert!(matches!(result, Err(SoundError::FileNotFound(_))));
    }

    #[test]
    fn test_file_validated_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"not audio").unwrap();

        let result = SoundSource::file_validated(&path);
        assert!(matches!(result, Err(SoundError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_file_validated_accepts_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Bell.WAV");
        std::fs::write(&path, b"RIFF").unwrap();

        let source = SoundSource::file_validated(&path).unwrap();
        assert_eq!(source.name(), "Bell");
    }

    #[test]
    fn test_resolve_sound_falls_back_to_chime() {
        assert_eq!(resolve_sound(None), SoundSource::Chime);
        assert_eq!(
            resolve_sound(Some(Path::new("/nonexistent/a.mp3"))),
            SoundSource::Chime
        );
    }
}
