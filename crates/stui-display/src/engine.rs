#![forbid(unsafe_code)]

//! Read-only view of the torrent engine.
//!
//! The display core never drives the engine; it only samples state
//! while painting. [`EngineView`] is the whole boundary: synchronous,
//! non-blocking accessors returning owned snapshots. The engine itself
//! (peer wire, trackers, disk) lives behind this trait in another
//! process component entirely.

use std::collections::VecDeque;

use stui_core::Timer;

/// Aggregate transfer statistics for the whole session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Current download rate in bytes per second.
    pub down_rate: u64,
    /// Current upload rate in bytes per second.
    pub up_rate: u64,
    /// Bytes downloaded since session start.
    pub down_total: u64,
    /// Bytes uploaded since session start.
    pub up_total: u64,
    /// Connected peers across all downloads.
    pub peers: u32,
}

/// Lifecycle state of a single download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadState {
    /// Fetching pieces.
    Downloading,
    /// Complete and uploading.
    Seeding,
    /// Stopped by the user.
    Paused,
    /// Verifying piece hashes.
    Checking,
    /// Stopped on an error.
    Error,
}

impl DownloadState {
    /// Short fixed-width tag for list columns.
    pub const fn label(self) -> &'static str {
        match self {
            DownloadState::Downloading => "down",
            DownloadState::Seeding => "seed",
            DownloadState::Paused => "stop",
            DownloadState::Checking => "hash",
            DownloadState::Error => "err!",
        }
    }
}

/// Point-in-time state of one download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSnapshot {
    /// Display name.
    pub name: String,
    /// Total size in bytes.
    pub size_bytes: u64,
    /// Bytes completed.
    pub done_bytes: u64,
    /// Current download rate in bytes per second.
    pub down_rate: u64,
    /// Current upload rate in bytes per second.
    pub up_rate: u64,
    /// Connected peers.
    pub peers: u32,
    /// Connected seeders.
    pub seeds: u32,
    /// Lifecycle state.
    pub state: DownloadState,
}

impl DownloadSnapshot {
    /// Completion ratio in `[0, 1]`; an empty download counts as done.
    pub fn completion(&self) -> f64 {
        if self.size_bytes == 0 {
            return 1.0;
        }
        self.done_bytes as f64 / self.size_bytes as f64
    }
}

/// One line of engine history (tracker replies, errors, hash results).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineEvent {
    /// When the event happened.
    pub at: Timer,
    /// Human-readable message.
    pub message: String,
}

/// The read-only accessor surface consumed inside `redraw` bodies.
pub trait EngineView {
    /// Session-wide transfer statistics.
    fn session(&self) -> SessionStats;

    /// Number of downloads in the session.
    fn download_count(&self) -> usize;

    /// Snapshots of every download, in engine order.
    fn downloads(&self) -> Vec<DownloadSnapshot>;

    /// The most recent `limit` history lines, oldest first.
    fn recent_events(&self, limit: usize) -> Vec<EngineEvent>;
}

/// Retained engine-event history.
const EVENT_CAP: usize = 64;

/// In-memory [`EngineView`] for tests and the demo binary.
#[derive(Default)]
pub struct StubEngine {
    stats: SessionStats,
    downloads: Vec<DownloadSnapshot>,
    events: VecDeque<EngineEvent>,
}

impl StubEngine {
    /// Empty engine: no downloads, zero rates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the session statistics.
    pub fn set_session(&mut self, stats: SessionStats) {
        self.stats = stats;
    }

    /// Append a download.
    pub fn push_download(&mut self, snapshot: DownloadSnapshot) {
        self.downloads.push(snapshot);
    }

    /// Mutable access to a download by index.
    pub fn download_mut(&mut self, index: usize) -> Option<&mut DownloadSnapshot> {
        self.downloads.get_mut(index)
    }

    /// Record a history line, trimming the oldest past the cap.
    pub fn push_event(&mut self, at: Timer, message: impl Into<String>) {
        if self.events.len() == EVENT_CAP {
            self.events.pop_front();
        }
        self.events.push_back(EngineEvent {
            at,
            message: message.into(),
        });
    }
}

impl EngineView for StubEngine {
    fn session(&self) -> SessionStats {
        self.stats
    }

    fn download_count(&self) -> usize {
        self.downloads.len()
    }

    fn downloads(&self) -> Vec<DownloadSnapshot> {
        self.downloads.clone()
    }

    fn recent_events(&self, limit: usize) -> Vec<EngineEvent> {
        let skip = self.events.len().saturating_sub(limit);
        self.events.iter().skip(skip).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{DownloadSnapshot, DownloadState, EngineView, StubEngine};
    use stui_core::Timer;

    fn snapshot(name: &str, size: u64, done: u64) -> DownloadSnapshot {
        DownloadSnapshot {
            name: name.to_owned(),
            size_bytes: size,
            done_bytes: done,
            down_rate: 0,
            up_rate: 0,
            peers: 0,
            seeds: 0,
            state: DownloadState::Downloading,
        }
    }

    #[test]
    fn completion_handles_empty_download() {
        assert_eq!(snapshot("t", 0, 0).completion(), 1.0);
        assert_eq!(snapshot("t", 100, 25).completion(), 0.25);
    }

    #[test]
    fn recent_events_returns_newest_tail() {
        let mut engine = StubEngine::new();
        for i in 0..10 {
            engine.push_event(Timer::from_seconds(i), format!("event {i}"));
        }
        let tail = engine.recent_events(3);
        assert_eq!(tail.len(), 3);
        assert_eq!(tail[0].message, "event 7");
        assert_eq!(tail[2].message, "event 9");
    }

    #[test]
    fn event_history_is_capped() {
        let mut engine = StubEngine::new();
        for i in 0..200 {
            engine.push_event(Timer::from_seconds(i), "x");
        }
        assert_eq!(engine.recent_events(usize::MAX).len(), super::EVENT_CAP);
    }
}
