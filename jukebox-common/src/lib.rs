//! # Jukebox Common Library
//!
//! Shared code for the jukebox services including:
//! - Song model (catalog-resolved identity)
//! - Event types (JukeboxEvent enum) and the EventBus
//! - Player configuration loading
//!
//! The playback controller lives in `jukebox-player`; UI and remote-client
//! services consume the same event vocabulary from here.

pub mod config;
pub mod error;
pub mod events;
pub mod model;

pub use error::{Error, Result};
pub use events::{EventBus, JukeboxEvent, PlayState};
pub use model::Song;
