//! Audio engine contract
//!
//! The session does not decode or output audio itself. It acquires one
//! engine instance per song from an [`AudioEngine`] and controls it through
//! an [`EngineHandle`]. Instances run on their own threads and report
//! lifecycle changes back over a channel; the session never blocks waiting
//! for audio.
//!
//! Every acquisition is tagged with a generation number. Reports carry the
//! generation of the instance that produced them, which lets the session
//! tell a report from the instance it currently owns apart from one that
//! raced with a stop or a song switch.

use crate::error::Result;
use jukebox_common::Song;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Identifier for one engine acquisition, unique within a session.
///
/// Monotonically increasing: a later acquisition always has a larger
/// generation than an earlier one.
pub type Generation = u64;

/// Asynchronous report from an engine instance.
#[derive(Debug, Clone)]
pub enum EngineReport {
    /// Audio output actually began. Decode and device setup take time, so
    /// this arrives some time after the acquire call returned.
    Started { generation: Generation },
    /// The song played through to its natural end.
    Completed { generation: Generation },
    /// The instance failed to start or aborted partway through the song.
    Failed { generation: Generation, message: String },
}

impl EngineReport {
    /// Generation of the instance that produced this report
    pub fn generation(&self) -> Generation {
        match self {
            EngineReport::Started { generation } => *generation,
            EngineReport::Completed { generation } => *generation,
            EngineReport::Failed { generation, .. } => *generation,
        }
    }
}

/// Handle to one live playback attempt.
///
/// The session holds at most one of these at a time. Both methods are
/// fire-and-forget signals: they must return promptly and never block on
/// decode or device work.
pub trait EngineHandle: Send + Sync {
    /// Toggle between audible and suspended without losing position.
    fn pause_or_resume(&self);

    /// Tell the instance to halt. Teardown finishes on the engine's own
    /// thread; any report it emits afterwards is discarded by generation.
    fn stop(&self);
}

/// Factory for engine instances.
pub trait AudioEngine: Send + Sync {
    /// Begin playback of `song`.
    ///
    /// This is a handoff, not a wait: a successful return means the engine
    /// accepted the song, not that audio is flowing yet. The instance sends
    /// [`EngineReport`]s tagged with `generation` through `reports` as its
    /// state changes. An error here means no instance exists and nothing
    /// will ever report under this generation.
    fn acquire(
        &self,
        song: Arc<Song>,
        generation: Generation,
        reports: mpsc::UnboundedSender<EngineReport>,
    ) -> Result<Box<dyn EngineHandle>>;
}
