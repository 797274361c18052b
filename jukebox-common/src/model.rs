//! Song model shared by the catalog, the playlist, and the event feed

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// A catalog-resolved song.
///
/// Owned by the catalog; the playlist and the event feed hold references
/// (`Arc<Song>`) and never mutate one. `location` is the playable handle
/// the audio engine consumes; the controller itself never opens it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    /// Catalog identity, assigned at scan time
    pub song_id: Uuid,
    pub artist: String,
    pub title: String,
    /// Playable handle (path under the music root)
    pub location: PathBuf,
}

impl Song {
    pub fn new(
        artist: impl Into<String>,
        title: impl Into<String>,
        location: impl Into<PathBuf>,
    ) -> Self {
        Self {
            song_id: Uuid::new_v4(),
            artist: artist.into(),
            title: title.into(),
            location: location.into(),
        }
    }
}

impl std::fmt::Display for Song {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.artist, self.title)
    }
}
