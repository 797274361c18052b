//! Scripted audio engine for session tests
//!
//! Stands in for a real decode/output backend. Every acquisition is
//! recorded; nothing reports on its own. Tests fire Started, Completed and
//! Failed reports by hand, including reports tagged with generations the
//! session has already released, which is how the stale-callback races are
//! reproduced deterministically.

use jukebox_common::Song;
use jukebox_player::engine::{AudioEngine, EngineHandle, EngineReport, Generation};
use jukebox_player::error::{Error, Result};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// One recorded acquire call
#[derive(Debug, Clone)]
pub struct AcquireRecord {
    pub song: Arc<Song>,
    pub generation: Generation,
}

#[derive(Default)]
struct FakeEngineInner {
    acquired: Vec<AcquireRecord>,
    attempts: usize,
    live: Option<Generation>,
    reports: Option<mpsc::UnboundedSender<EngineReport>>,
    fail_next_acquire: bool,
    overlap_observed: bool,
    stop_calls: usize,
    toggle_calls: usize,
}

/// Scripted engine. Sessions hold it as `Arc<dyn AudioEngine>`; tests keep
/// their own `Arc` to inspect and drive it.
#[derive(Default)]
pub struct FakeEngine {
    inner: Arc<Mutex<FakeEngineInner>>,
}

impl FakeEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make the next acquire call fail
    pub fn fail_next_acquire(&self) {
        self.inner.lock().unwrap().fail_next_acquire = true;
    }

    /// Report that audio began flowing for the live instance
    pub fn report_started(&self) {
        self.report_live(|generation| EngineReport::Started { generation });
    }

    /// Report that the live instance played its song to the end
    pub fn report_completed(&self) {
        self.report_live(|generation| EngineReport::Completed { generation });
    }

    /// Report a failure from the live instance
    pub fn report_failed(&self, message: &str) {
        let message = message.to_string();
        self.report_live(move |generation| EngineReport::Failed {
            generation,
            message,
        });
    }

    /// Send a raw report, stale generations included
    pub fn send_report(&self, report: EngineReport) {
        let inner = self.inner.lock().unwrap();
        inner
            .reports
            .as_ref()
            .expect("no acquisition has supplied a report channel yet")
            .send(report)
            .unwrap();
    }

    fn report_live(&self, build: impl FnOnce(Generation) -> EngineReport) {
        let inner = self.inner.lock().unwrap();
        let generation = inner.live.expect("no live instance to report for");
        inner
            .reports
            .as_ref()
            .expect("live instance without a report channel")
            .send(build(generation))
            .unwrap();
    }

    /// Successful acquisitions, in order
    pub fn acquired(&self) -> Vec<AcquireRecord> {
        self.inner.lock().unwrap().acquired.clone()
    }

    /// Number of successful acquisitions
    pub fn acquire_count(&self) -> usize {
        self.inner.lock().unwrap().acquired.len()
    }

    /// Number of acquire calls, failures included
    pub fn attempt_count(&self) -> usize {
        self.inner.lock().unwrap().attempts
    }

    /// Generation of the instance that is currently neither stopped nor
    /// dropped, if any
    pub fn live_generation(&self) -> Option<Generation> {
        self.inner.lock().unwrap().live
    }

    /// Times stop() was signalled on any handle
    pub fn stop_calls(&self) -> usize {
        self.inner.lock().unwrap().stop_calls
    }

    /// Times pause_or_resume() was signalled on any handle
    pub fn toggle_calls(&self) -> usize {
        self.inner.lock().unwrap().toggle_calls
    }

    /// True if an acquisition ever happened while an earlier instance was
    /// still neither stopped nor dropped
    pub fn overlap_observed(&self) -> bool {
        self.inner.lock().unwrap().overlap_observed
    }
}

impl AudioEngine for FakeEngine {
    fn acquire(
        &self,
        song: Arc<Song>,
        generation: Generation,
        reports: mpsc::UnboundedSender<EngineReport>,
    ) -> Result<Box<dyn EngineHandle>> {
        let mut inner = self.inner.lock().unwrap();
        inner.attempts += 1;
        if inner.fail_next_acquire {
            inner.fail_next_acquire = false;
            return Err(Error::EngineAcquire(
                "scripted acquire failure".to_string(),
            ));
        }
        if inner.live.is_some() {
            inner.overlap_observed = true;
        }
        inner.acquired.push(AcquireRecord { song, generation });
        inner.live = Some(generation);
        inner.reports = Some(reports);
        Ok(Box::new(FakeHandle {
            inner: self.inner.clone(),
            generation,
        }))
    }
}

struct FakeHandle {
    inner: Arc<Mutex<FakeEngineInner>>,
    generation: Generation,
}

impl EngineHandle for FakeHandle {
    fn pause_or_resume(&self) {
        self.inner.lock().unwrap().toggle_calls += 1;
    }

    fn stop(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.stop_calls += 1;
        if inner.live == Some(self.generation) {
            inner.live = None;
        }
    }
}

impl Drop for FakeHandle {
    fn drop(&mut self) {
        let mut inner = self.inner.lock().unwrap();
        if inner.live == Some(self.generation) {
            inner.live = None;
        }
    }
}
