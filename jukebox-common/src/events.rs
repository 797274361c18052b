//! Event types for the jukebox event system
//!
//! Provides the shared event vocabulary and the EventBus. The playback
//! controller emits these; UI and remote-client feeds subscribe and render
//! them. Subscribers never mutate controller state.

use crate::model::Song;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Playback session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayState {
    Stopped,
    Playing,
    Paused,
}

impl std::fmt::Display for PlayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayState::Stopped => write!(f, "stopped"),
            PlayState::Playing => write!(f, "playing"),
            PlayState::Paused => write!(f, "paused"),
        }
    }
}

/// Jukebox event types
///
/// Events are broadcast via EventBus and serialize with a `type` tag, ready
/// for an SSE or socket feed. Delivery is best-effort: a lagging or absent
/// subscriber never affects the emitting side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum JukeboxEvent {
    /// A song was appended to the shared playlist
    ///
    /// Triggers:
    /// - UI: append a playlist row
    /// - Remote feed: confirm the request that added it
    SongAdded {
        /// Position the song landed at (0-based)
        index: usize,
        /// The song, as resolved by the catalog
        song: Song,
        /// When the song was added
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A playlist row was removed
    ///
    /// Triggers:
    /// - UI: drop the row, re-derive highlighting
    SongRemoved {
        /// Position that was removed (0-based, pre-removal indexing)
        index: usize,
        /// When the row was removed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Removing the playing song left the playlist empty
    ///
    /// Explicit "nothing to play" signal: the session stopped because there
    /// is no material left, not because someone pressed stop.
    PlaylistEmptied {
        /// When the playlist emptied
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Playback session state changed (stopped/playing/paused)
    ///
    /// Triggers:
    /// - UI: update transport controls
    PlayStateChanged {
        /// State before the transition
        old_state: PlayState,
        /// State after the transition
        new_state: PlayState,
        /// When the state changed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// The engine reported that audio output actually began
    ///
    /// Acquiring an engine instance is a non-blocking handoff; this arrives
    /// asynchronously once sound is flowing. UIs refresh row highlighting on
    /// it rather than on the acquire.
    PlaybackStarted {
        /// Playlist position being played (0-based)
        index: usize,
        /// The song being played
        song: Song,
        /// When the engine reported the start
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// The engine instance failed to start or aborted mid-song
    ///
    /// The session settles in Stopped with the cursor pulled back, so a
    /// plain start retries the same song.
    EngineFault {
        /// Engine-supplied failure description
        message: String,
        /// When the fault was observed
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl JukeboxEvent {
    /// Get event type as string for filtering
    pub fn event_type(&self) -> &str {
        match self {
            JukeboxEvent::SongAdded { .. } => "SongAdded",
            JukeboxEvent::SongRemoved { .. } => "SongRemoved",
            JukeboxEvent::PlaylistEmptied { .. } => "PlaylistEmptied",
            JukeboxEvent::PlayStateChanged { .. } => "PlayStateChanged",
            JukeboxEvent::PlaybackStarted { .. } => "PlaybackStarted",
            JukeboxEvent::EngineFault { .. } => "EngineFault",
        }
    }
}

/// Central event distribution bus
///
/// Wraps tokio::broadcast, providing:
/// - Non-blocking publish (slow subscribers don't block producers)
/// - Multiple concurrent subscribers
/// - Automatic cleanup when subscribers drop
///
/// # Examples
///
/// ```
/// use jukebox_common::events::{EventBus, JukeboxEvent, PlayState};
///
/// let bus = EventBus::new(100);
/// let _rx = bus.subscribe();
///
/// bus.emit_lossy(JukeboxEvent::PlayStateChanged {
///     old_state: PlayState::Stopped,
///     new_state: PlayState::Playing,
///     timestamp: chrono::Utc::now(),
/// });
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<JukeboxEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with the given channel capacity
    ///
    /// Capacity is the number of events buffered per subscriber before the
    /// oldest are dropped; lagging subscribers see a Lagged error, not a
    /// blocked producer.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<JukeboxEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists,
    /// `Err` if none are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: JukeboxEvent,
    ) -> Result<usize, broadcast::error::SendError<JukeboxEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring whether anyone is listening
    ///
    /// The controller uses this for every notification: the sink is an
    /// observer, and its absence or failure must never affect playback state.
    pub fn emit_lossy(&self, event: JukeboxEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
