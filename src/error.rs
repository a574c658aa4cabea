//! Error types
//!
//! Audio errors never escape the `AudioSession`; they are logged and dropped.
//! Settings errors fall back to defaults at load time.

use thiserror::Error;

/// Failure to open or start an audio track
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioError {
    /// The platform could not create the audio resource
    #[error("audio unavailable: {0}")]
    Unavailable(String),
    /// The platform refused to start playback (e.g. autoplay policy)
    #[error("playback rejected: {0}")]
    PlaybackRejected(String),
}

/// Failure to load or validate settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}
