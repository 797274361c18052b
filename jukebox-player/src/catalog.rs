//! Song catalog lookup
//!
//! Remote clients request songs by artist and title, not by id or path.
//! The catalog is the component that turns those names into playable
//! [`Song`] records. Lookup is pure: it never touches the playlist or the
//! engine, so the session performs it outside the state lock.

use jukebox_common::Song;
use std::collections::HashMap;
use std::sync::Arc;

/// Resolves (artist, title) pairs to songs.
///
/// Implementations must be safe to call concurrently from handler threads.
/// A miss is an expected outcome (clients type names by hand), so the
/// return type is an `Option` rather than an error.
pub trait Catalog: Send + Sync {
    /// Look up a song by exact artist and title.
    fn lookup(&self, artist: &str, title: &str) -> Option<Arc<Song>>;
}

/// In-memory catalog backed by a hash map.
///
/// Suitable for tests and for small deployments where the library is
/// scanned once at startup. Songs are stored behind `Arc` so a lookup
/// hands out a shared reference instead of a copy.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    songs: HashMap<(String, String), Arc<Song>>,
}

impl MemoryCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from an iterator of songs
    pub fn from_songs(songs: impl IntoIterator<Item = Song>) -> Self {
        let mut catalog = Self::new();
        for song in songs {
            catalog.add(song);
        }
        catalog
    }

    /// Add a song, replacing any existing entry with the same artist and
    /// title. Returns the shared handle now stored in the catalog.
    pub fn add(&mut self, song: Song) -> Arc<Song> {
        let key = (song.artist.clone(), song.title.clone());
        let song = Arc::new(song);
        self.songs.insert(key, song.clone());
        song
    }

    /// Number of songs in the catalog
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    /// Whether the catalog holds no songs
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }
}

impl Catalog for MemoryCatalog {
    fn lookup(&self, artist: &str, title: &str) -> Option<Arc<Song>> {
        self.songs
            .get(&(artist.to_owned(), title.to_owned()))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MemoryCatalog {
        MemoryCatalog::from_songs([
            Song::new("Miles Davis", "So What", "/music/miles/so_what.flac"),
            Song::new("Nina Simone", "Sinnerman", "/music/nina/sinnerman.flac"),
        ])
    }

    #[test]
    fn test_lookup_hit() {
        let catalog = sample();
        let song = catalog.lookup("Miles Davis", "So What").unwrap();
        assert_eq!(song.artist, "Miles Davis");
        assert_eq!(song.title, "So What");
    }

    #[test]
    fn test_lookup_miss() {
        let catalog = sample();
        assert!(catalog.lookup("Miles Davis", "Blue in Green").is_none());
        assert!(catalog.lookup("miles davis", "So What").is_none());
    }

    #[test]
    fn test_lookup_returns_shared_handle() {
        let mut catalog = MemoryCatalog::new();
        let added = catalog.add(Song::new("Her", "Song", "/music/song.mp3"));
        let found = catalog.lookup("Her", "Song").unwrap();
        assert!(Arc::ptr_eq(&added, &found));
    }

    #[test]
    fn test_add_replaces_same_name() {
        let mut catalog = sample();
        assert_eq!(catalog.len(), 2);
        catalog.add(Song::new("Miles Davis", "So What", "/music/remaster.flac"));
        assert_eq!(catalog.len(), 2);
        let song = catalog.lookup("Miles Davis", "So What").unwrap();
        assert_eq!(song.location.to_str().unwrap(), "/music/remaster.flac");
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = MemoryCatalog::new();
        assert!(catalog.is_empty());
        assert!(catalog.lookup("Anyone", "Anything").is_none());
    }
}
