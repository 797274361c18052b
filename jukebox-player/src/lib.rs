//! # Jukebox Playback Controller (jukebox-player)
//!
//! Shared-playlist playback control for a single audio output.
//!
//! **Purpose:** Keep one ordered playlist and one transport (stopped,
//! playing, paused) coherent while network handler tasks, a local UI and
//! asynchronous engine callbacks all drive it concurrently.
//!
//! **Architecture:** One async mutex around the playlist and transport
//! state; engine callbacks arrive as messages over a channel and are
//! applied by a pump task under the same lock. The audio engine itself
//! lives behind the [`engine::AudioEngine`] trait and is acquired once per
//! song, tagged with a generation so late reports from released instances
//! are discarded.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod playlist;
pub mod session;

pub use catalog::{Catalog, MemoryCatalog};
pub use engine::{AudioEngine, EngineHandle, EngineReport, Generation};
pub use error::{Error, Result};
pub use playlist::{Playlist, RemoveOutcome};
pub use session::{PlaybackSession, SessionStatus};
