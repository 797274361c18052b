//! Error types for the playback controller

use thiserror::Error;

/// Errors returned to callers of the playback session.
///
/// Internal degradations (an engine instance failing mid-song, an acquire
/// attempt that does not produce audio) are not errors in this sense: they
/// surface as state transitions and notifications instead, so a remote
/// handler thread is never taken down by a fault on the audio side.
#[derive(Error, Debug)]
pub enum Error {
    /// Caller supplied a playlist position that does not exist
    #[error("Index {index} out of range: playlist has {len} song(s)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Catalog lookup by artist and title found nothing
    #[error("Song not found in catalog: {artist} - {title}")]
    SongNotFound { artist: String, title: String },

    /// The audio engine could not produce a playable instance.
    ///
    /// Returned by [`AudioEngine::acquire`](crate::engine::AudioEngine::acquire)
    /// implementations. The session absorbs it (transition to Stopped plus an
    /// `EngineFault` notification) rather than passing it back to the caller.
    #[error("Engine acquire failed: {0}")]
    EngineAcquire(String),
}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;
