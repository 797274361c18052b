//! Test helper modules for playback controller integration tests
//!
//! Provides reusable test infrastructure:
//! - FakeEngine: scripted audio engine driven by hand from tests
//! - Event helpers: await specific notifications with timeouts
//! - Fixtures: catalog, bus and session wiring

#![allow(dead_code)]

pub mod fake_engine;

pub use fake_engine::FakeEngine;

use jukebox_common::{EventBus, JukeboxEvent, Song};
use jukebox_player::{MemoryCatalog, PlaybackSession};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::{sleep, timeout};

/// Long enough for anything already in flight, short enough to fail fast
pub const EVENT_TIMEOUT: Duration = Duration::from_secs(2);

/// Song with a recognizable title
pub fn make_song(title: &str) -> Arc<Song> {
    Arc::new(Song::new(
        "Test Artist",
        title,
        format!("/music/{title}.flac"),
    ))
}

/// Session wired to a fresh FakeEngine and an empty catalog.
///
/// The returned receiver was subscribed before the session existed, so it
/// sees every notification the session ever publishes.
pub fn fake_session() -> (
    PlaybackSession,
    Arc<FakeEngine>,
    broadcast::Receiver<JukeboxEvent>,
) {
    fake_session_with_catalog(MemoryCatalog::new())
}

/// Session wired to a fresh FakeEngine and the given catalog
pub fn fake_session_with_catalog(
    catalog: MemoryCatalog,
) -> (
    PlaybackSession,
    Arc<FakeEngine>,
    broadcast::Receiver<JukeboxEvent>,
) {
    let engine = FakeEngine::new();
    let bus = EventBus::new(256);
    let rx = bus.subscribe();
    let session = PlaybackSession::new(Arc::new(catalog), engine.clone(), bus);
    (session, engine, rx)
}

/// Next event on the bus, panicking if none arrives in time
pub async fn next_event(rx: &mut broadcast::Receiver<JukeboxEvent>) -> JukeboxEvent {
    timeout(EVENT_TIMEOUT, rx.recv())
        .await
        .expect("timed out waiting for an event")
        .expect("event bus closed")
}

/// Skip forward to the next event of the named type, discarding others
pub async fn wait_for(
    rx: &mut broadcast::Receiver<JukeboxEvent>,
    event_type: &str,
) -> JukeboxEvent {
    loop {
        let event = next_event(rx).await;
        if event.event_type() == event_type {
            return event;
        }
    }
}

/// Poll until `check` passes, for effects that carry no notification
pub async fn wait_until(what: &str, check: impl Fn() -> bool) {
    let waited = timeout(EVENT_TIMEOUT, async {
        while !check() {
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await;
    assert!(waited.is_ok(), "gave up waiting for {what}");
}

/// Everything currently queued on the receiver
pub fn drain(rx: &mut broadcast::Receiver<JukeboxEvent>) -> Vec<JukeboxEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Install a subscriber that honors RUST_LOG; later calls are no-ops
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}
