//! Playback session
//!
//! The controller's core: one exclusion domain around the playlist and the
//! transport state. Remote handler tasks, the local UI and the engine
//! report pump all enter through the same async mutex, so every operation
//! observes fully settled state and leaves it the same way.
//!
//! Engine callbacks never enter the domain directly. Instances write
//! reports into a channel from their own threads; a pump task owned by the
//! session drains the channel and applies each report under the lock. A
//! report that fires while a command holds the lock is applied after that
//! command commits. Reports carry the generation of the instance that sent
//! them, and the session discards any report whose generation is not the
//! one it currently owns, which settles every stop/complete race the same
//! way: commands win.

use crate::catalog::Catalog;
use crate::engine::{AudioEngine, EngineHandle, EngineReport, Generation};
use crate::error::{Error, Result};
use crate::playlist::{Playlist, RemoveOutcome};
use chrono::Utc;
use jukebox_common::{EventBus, JukeboxEvent, PlayState, Song};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, Mutex};
use tracing::{debug, info, warn};

/// The one live engine acquisition, when there is one
struct ActiveEngine {
    generation: Generation,
    handle: Box<dyn EngineHandle>,
}

/// Everything the session lock protects.
///
/// Playlist, transport state, engine handle and the started flag share
/// invariants (a live engine exists exactly while the state is Playing or
/// Paused) and must never be observed mid-update, so they live under one
/// mutex as one value.
struct SessionInner {
    playlist: Playlist,
    state: PlayState,
    active: Option<ActiveEngine>,
    next_generation: Generation,
    media_started: bool,
}

/// Consistent view of the session at a single instant
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    /// Transport state
    pub state: PlayState,
    /// Playing cursor, if one exists
    pub cursor: Option<usize>,
    /// Number of songs listed
    pub playlist_len: usize,
    /// Whether the engine has confirmed audio is actually flowing
    pub media_started: bool,
}

/// Shared playback controller.
///
/// Cheap to clone; all clones drive the same session. Commands lock, apply,
/// notify and return. Nothing here blocks on audio: engine work happens on
/// the engine's threads and comes back as reports through the pump.
#[derive(Clone)]
pub struct PlaybackSession {
    inner: Arc<Mutex<SessionInner>>,
    catalog: Arc<dyn Catalog>,
    engine: Arc<dyn AudioEngine>,
    events: EventBus,
    reports: mpsc::UnboundedSender<EngineReport>,
}

impl PlaybackSession {
    /// Create a session and spawn its engine report pump.
    ///
    /// Must be called from within a Tokio runtime; the pump runs as a task
    /// for the life of the process.
    pub fn new(
        catalog: Arc<dyn Catalog>,
        engine: Arc<dyn AudioEngine>,
        events: EventBus,
    ) -> Self {
        let (report_tx, report_rx) = mpsc::unbounded_channel();
        let session = Self {
            inner: Arc::new(Mutex::new(SessionInner {
                playlist: Playlist::new(),
                state: PlayState::Stopped,
                active: None,
                next_generation: 0,
                media_started: false,
            })),
            catalog,
            engine,
            events,
            reports: report_tx,
        };
        session.spawn_report_pump(report_rx);
        session
    }

    fn spawn_report_pump(&self, mut rx: mpsc::UnboundedReceiver<EngineReport>) {
        let session = self.clone();
        tokio::spawn(async move {
            debug!("Engine report pump started");
            while let Some(report) = rx.recv().await {
                session.handle_report(report).await;
            }
            debug!("Engine report pump stopped");
        });
    }

    // ========================================
    // Playlist commands
    // ========================================

    /// Append a song at the tail of the playlist.
    ///
    /// Never touches the cursor or the engine, so appending while a song
    /// plays is invisible to it. Returns the index the song landed at.
    pub async fn append(&self, song: Arc<Song>) -> usize {
        let mut inner = self.inner.lock().await;
        let index = inner.playlist.append(song.clone());
        info!("Appended {} at index {}", song, index);
        self.events.emit_lossy(JukeboxEvent::SongAdded {
            index,
            song: (*song).clone(),
            timestamp: Utc::now(),
        });
        index
    }

    /// Resolve a song by artist and title against the catalog and append it.
    ///
    /// The lookup runs outside the lock. A miss changes nothing and comes
    /// back as an error for the handler to relay to its client.
    pub async fn add_by_name(&self, artist: &str, title: &str) -> Result<usize> {
        let song = match self.catalog.lookup(artist, title) {
            Some(song) => song,
            None => {
                debug!("Catalog miss: {} - {}", artist, title);
                return Err(Error::SongNotFound {
                    artist: artist.to_string(),
                    title: title.to_string(),
                });
            }
        };
        Ok(self.append(song).await)
    }

    /// Remove the song at `index`.
    ///
    /// Removing ahead of or behind the playing song leaves playback alone;
    /// the cursor slides as needed. Removing the playing row itself stops
    /// the engine and, if songs remain, restarts on whatever shifted into
    /// the slot. Removing the playing row when it was the only one left
    /// announces the playlist emptied instead.
    pub async fn remove_at(&self, index: usize) -> Result<()> {
        let mut inner = self.inner.lock().await;
        let outcome = inner.playlist.remove_at(index)?;
        info!("Removed song at index {} ({:?})", index, outcome);
        self.events.emit_lossy(JukeboxEvent::SongRemoved {
            index,
            timestamp: Utc::now(),
        });
        if outcome == RemoveOutcome::RemovedCurrent {
            let was_live = self.release_active(&mut inner);
            if inner.playlist.is_empty() {
                self.events.emit_lossy(JukeboxEvent::PlaylistEmptied {
                    timestamp: Utc::now(),
                });
                self.transition(&mut inner, PlayState::Stopped);
            } else if was_live {
                // the cursor already rests on the predecessor, so this picks
                // up the song that slid into the removed slot
                self.start_locked(&mut inner);
            }
        }
        Ok(())
    }

    // ========================================
    // Transport commands
    // ========================================

    /// Begin playback at the song after the cursor (the head when nothing
    /// has played yet).
    ///
    /// Quietly does nothing when playback is already under way, the
    /// playlist is empty, or the cursor is already on the last song.
    pub async fn start(&self) {
        let mut inner = self.inner.lock().await;
        if inner.state != PlayState::Stopped {
            debug!("Start ignored: already {}", inner.state);
            return;
        }
        self.start_locked(&mut inner);
    }

    /// Stop playback, keeping the playlist.
    ///
    /// The cursor steps back one so the next start replays the interrupted
    /// song from its beginning. Stopping when nothing plays is a no-op.
    pub async fn stop(&self) {
        let mut inner = self.inner.lock().await;
        if !self.release_active(&mut inner) {
            debug!("Stop ignored: no live engine instance");
            return;
        }
        inner.playlist.rewind();
        self.transition(&mut inner, PlayState::Stopped);
    }

    /// Suspend audio without losing position. A no-op unless playing.
    pub async fn pause(&self) {
        let mut inner = self.inner.lock().await;
        if inner.state != PlayState::Playing {
            debug!("Pause ignored: state is {}", inner.state);
            return;
        }
        if let Some(active) = &inner.active {
            active.handle.pause_or_resume();
        }
        self.transition(&mut inner, PlayState::Paused);
    }

    /// Resume suspended audio from exactly where it paused.
    ///
    /// Resuming while already playing is a no-op. Resuming from Stopped is
    /// treated as a start: the interrupted song replays from its beginning
    /// rather than picking up mid-stream.
    pub async fn resume(&self) {
        let mut inner = self.inner.lock().await;
        match inner.state {
            PlayState::Paused => {
                if let Some(active) = &inner.active {
                    active.handle.pause_or_resume();
                }
                self.transition(&mut inner, PlayState::Playing);
            }
            PlayState::Playing => debug!("Resume ignored: already playing"),
            PlayState::Stopped => self.start_locked(&mut inner),
        }
    }

    /// Jump the cursor straight to `index` and play that song, replacing
    /// any live playback.
    pub async fn play_at(&self, index: usize) -> Result<()> {
        let mut inner = self.inner.lock().await;
        let song = inner.playlist.jump(index)?;
        self.release_active(&mut inner);
        self.acquire_and_play(&mut inner, index, song);
        Ok(())
    }

    // ========================================
    // Queries
    // ========================================

    /// Playing cursor position, if one exists
    pub async fn current_index(&self) -> Option<usize> {
        self.inner.lock().await.playlist.cursor()
    }

    /// Current transport state
    pub async fn play_state(&self) -> PlayState {
        self.inner.lock().await.state
    }

    /// Number of songs in the playlist
    pub async fn len(&self) -> usize {
        self.inner.lock().await.playlist.len()
    }

    /// Whether the playlist holds no songs
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.playlist.is_empty()
    }

    /// Song at `index`
    pub async fn song_at(&self, index: usize) -> Result<Arc<Song>> {
        self.inner.lock().await.playlist.song_at(index).cloned()
    }

    /// Ordered copy of the playlist
    pub async fn snapshot(&self) -> Vec<Arc<Song>> {
        self.inner.lock().await.playlist.snapshot()
    }

    /// State, cursor, length and started flag read under one lock
    pub async fn status(&self) -> SessionStatus {
        let inner = self.inner.lock().await;
        SessionStatus {
            state: inner.state,
            cursor: inner.playlist.cursor(),
            playlist_len: inner.playlist.len(),
            media_started: inner.media_started,
        }
    }

    /// Subscribe to session notifications
    pub fn subscribe(&self) -> broadcast::Receiver<JukeboxEvent> {
        self.events.subscribe()
    }

    /// The bus this session publishes notifications on
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    // ========================================
    // Internals (called with the lock held)
    // ========================================

    /// Apply one engine report.
    ///
    /// Reports race with commands: an instance may complete at the same
    /// moment a handler stops it. The generation check settles every such
    /// race in the command's favor.
    async fn handle_report(&self, report: EngineReport) {
        let mut inner = self.inner.lock().await;
        let owned = inner.active.as_ref().map(|a| a.generation);
        if owned != Some(report.generation()) {
            debug!(
                "Discarding stale engine report {:?} (owned generation {:?})",
                report, owned
            );
            return;
        }
        match report {
            EngineReport::Started { generation } => {
                inner.media_started = true;
                if let (Some(index), Some(song)) =
                    (inner.playlist.cursor(), inner.playlist.current_song())
                {
                    info!(
                        "Audio started for {} at index {} (generation {})",
                        song, index, generation
                    );
                    self.events.emit_lossy(JukeboxEvent::PlaybackStarted {
                        index,
                        song: (**song).clone(),
                        timestamp: Utc::now(),
                    });
                }
            }
            EngineReport::Completed { generation } => {
                debug!("Song completed (generation {})", generation);
                // natural end: the instance is already gone, just drop the handle
                let _ = inner.active.take();
                inner.media_started = false;
                self.start_locked(&mut inner);
            }
            EngineReport::Failed {
                generation,
                message,
            } => {
                warn!("Engine instance failed (generation {}): {}", generation, message);
                let _ = inner.active.take();
                inner.media_started = false;
                inner.playlist.rewind();
                self.events.emit_lossy(JukeboxEvent::EngineFault {
                    message,
                    timestamp: Utc::now(),
                });
                self.transition(&mut inner, PlayState::Stopped);
            }
        }
    }

    /// Advance the cursor and play the song it lands on. When there is
    /// nothing to advance to, settle in Stopped with the cursor untouched.
    fn start_locked(&self, inner: &mut SessionInner) {
        match inner.playlist.advance() {
            None => {
                debug!(
                    "Nothing to play (cursor {:?}, {} song(s) listed)",
                    inner.playlist.cursor(),
                    inner.playlist.len()
                );
                self.transition(inner, PlayState::Stopped);
            }
            Some((index, song)) => self.acquire_and_play(inner, index, song),
        }
    }

    /// Acquire an engine instance for `song` at playlist position `index`.
    ///
    /// On failure the cursor steps back so a later start retries the same
    /// song, the session settles in Stopped and listeners are told. The
    /// caller never sees the acquire error.
    fn acquire_and_play(&self, inner: &mut SessionInner, index: usize, song: Arc<Song>) {
        inner.next_generation += 1;
        let generation = inner.next_generation;
        inner.media_started = false;
        match self
            .engine
            .acquire(song.clone(), generation, self.reports.clone())
        {
            Ok(handle) => {
                info!(
                    "Acquired engine for {} at index {} (generation {})",
                    song, index, generation
                );
                inner.active = Some(ActiveEngine { generation, handle });
                self.transition(inner, PlayState::Playing);
            }
            Err(e) => {
                warn!(
                    "Engine acquire failed for {} at index {}: {}",
                    song, index, e
                );
                inner.playlist.rewind();
                self.events.emit_lossy(JukeboxEvent::EngineFault {
                    message: e.to_string(),
                    timestamp: Utc::now(),
                });
                self.transition(inner, PlayState::Stopped);
            }
        }
    }

    /// Stop and drop the live engine instance, if any. Returns whether one
    /// existed. The handle is fully dropped before this returns, so a new
    /// acquisition never overlaps the old instance.
    fn release_active(&self, inner: &mut SessionInner) -> bool {
        match inner.active.take() {
            Some(active) => {
                debug!("Releasing engine instance (generation {})", active.generation);
                active.handle.stop();
                inner.media_started = false;
                true
            }
            None => false,
        }
    }

    /// Change the transport state, announcing it when it actually changes
    fn transition(&self, inner: &mut SessionInner, new_state: PlayState) {
        if inner.state == new_state {
            return;
        }
        let old_state = inner.state;
        inner.state = new_state;
        info!("Play state: {} -> {}", old_state, new_state);
        self.events.emit_lossy(JukeboxEvent::PlayStateChanged {
            old_state,
            new_state,
            timestamp: Utc::now(),
        });
    }
}
