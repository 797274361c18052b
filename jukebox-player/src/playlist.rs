//! Shared playlist state
//!
//! An ordered list of songs plus the playing cursor, kept as one value so
//! the two can never disagree. All mutation goes through methods that keep
//! the cursor invariant: after every operation the cursor is either absent
//! or a valid index into the list.
//!
//! The cursor marks a position, not a song. Playlists routinely hold the
//! same song twice, so every operation here works on indices and never
//! disambiguates by song equality.

use crate::error::{Error, Result};
use jukebox_common::Song;
use std::sync::Arc;

/// How a removal affected the playing cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// Removed a row after the cursor, or there was no cursor. Nothing moved.
    Unaffected,
    /// Removed a row before the cursor. The cursor slid down one to keep
    /// naming the same row.
    Shifted,
    /// Removed the cursor row itself. The cursor now sits on the removed
    /// row's predecessor (or is absent if there was none), so that a
    /// subsequent advance lands on whatever shifted into the removed slot.
    /// The session decides what happens to any live playback.
    RemovedCurrent,
}

/// Ordered songs plus the playing cursor.
///
/// Purely a data structure with no locking of its own. The session wraps
/// one of these in its lock and layers engine policy and notifications on
/// top.
#[derive(Debug, Default)]
pub struct Playlist {
    songs: Vec<Arc<Song>>,
    cursor: Option<usize>,
}

impl Playlist {
    /// Create an empty playlist with no cursor
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a song at the tail. Returns the index it landed at.
    pub fn append(&mut self, song: Arc<Song>) -> usize {
        self.songs.push(song);
        self.songs.len() - 1
    }

    /// Remove the song at `index`, adjusting the cursor so it keeps naming
    /// the same row where possible. Returns how the cursor was affected.
    pub fn remove_at(&mut self, index: usize) -> Result<RemoveOutcome> {
        if index >= self.songs.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.songs.len(),
            });
        }
        self.songs.remove(index);
        let outcome = match self.cursor {
            Some(c) if index < c => {
                self.cursor = Some(c - 1);
                RemoveOutcome::Shifted
            }
            Some(c) if index == c => {
                self.cursor = if c == 0 { None } else { Some(c - 1) };
                RemoveOutcome::RemovedCurrent
            }
            _ => RemoveOutcome::Unaffected,
        };
        Ok(outcome)
    }

    /// Song at `index`, or an error naming the bound that was violated
    pub fn song_at(&self, index: usize) -> Result<&Arc<Song>> {
        self.songs.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.songs.len(),
        })
    }

    /// Number of songs
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    /// Whether the playlist holds no songs
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// Current cursor position, if any
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Song under the cursor, if there is one
    pub fn current_song(&self) -> Option<&Arc<Song>> {
        self.cursor.and_then(|c| self.songs.get(c))
    }

    /// Move the cursor to the next song and return it.
    ///
    /// With no cursor the next song is the head. Returns `None` without
    /// touching anything when the cursor is already on the last song (or
    /// the playlist is empty); the caller reads the cursor afterwards to
    /// see where playback stopped.
    pub fn advance(&mut self) -> Option<(usize, Arc<Song>)> {
        let candidate = match self.cursor {
            None => 0,
            Some(c) => c + 1,
        };
        if candidate >= self.songs.len() {
            return None;
        }
        self.cursor = Some(candidate);
        Some((candidate, self.songs[candidate].clone()))
    }

    /// Pull the cursor back one position.
    ///
    /// Used when playback stops so that the next advance replays the song
    /// that was interrupted. From the head the cursor becomes absent, which
    /// makes advance start over from the head again.
    pub fn rewind(&mut self) {
        self.cursor = match self.cursor {
            None | Some(0) => None,
            Some(c) => Some(c - 1),
        };
    }

    /// Place the cursor directly on `index` and return that song
    pub fn jump(&mut self, index: usize) -> Result<Arc<Song>> {
        let song = self.song_at(index)?.clone();
        self.cursor = Some(index);
        Ok(song)
    }

    /// Copy of the song list in order
    pub fn snapshot(&self) -> Vec<Arc<Song>> {
        self.songs.clone()
    }
}
