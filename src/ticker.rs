//! Simulated download activity
//!
//! Feeds the downloads panel with mock traffic: a new download every
//! [`SPAWN_INTERVAL`] (while fewer than [`MAX_CONCURRENT`] are running) and
//! random progress every [`PROGRESS_INTERVAL`]. Driven by the UI frame loop.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::storage::{DownloadStatus, Downloads};

pub const SPAWN_INTERVAL: Duration = Duration::from_secs(10);
pub const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);
pub const MAX_CONCURRENT: usize = 2;
/// Upper bound (exclusive) of one progress step, in percent
pub const MAX_STEP: f64 = 15.0;

const MOCK_FILES: [(&str, &str); 5] = [
    ("project-assets.zip", "128.3 MB"),
    ("quarterly-report.docx", "876 KB"),
    ("team-photo.jpeg", "4.1 MB"),
    ("audio-driver-update.pkg", "15.6 MB"),
    ("presentation-deck.pptx", "22.9 MB"),
];

/// What one tick changed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Id of a newly started mock download
    pub spawned: Option<String>,
    /// Downloads that reached 100% during this tick
    pub completed: usize,
}

/// Mock download driver
pub struct DownloadTicker<R = StdRng> {
    rng: R,
    last_spawn: Option<Instant>,
    last_progress: Option<Instant>,
}

impl DownloadTicker<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl Default for DownloadTicker<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> DownloadTicker<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            last_spawn: None,
            last_progress: None,
        }
    }

    /// Disarm both timers; the next tick starts a fresh cycle
    pub fn reset(&mut self) {
        self.last_spawn = None;
        self.last_progress = None;
    }

    /// Advance the simulation to `now`
    pub fn tick(&mut self, downloads: &mut Downloads, now: Instant) -> TickReport {
        let mut report = TickReport::default();

        let spawn_due = *self.last_spawn.get_or_insert(now);
        if now.duration_since(spawn_due) >= SPAWN_INTERVAL {
            self.last_spawn = Some(now);
            if downloads.in_progress_count() < MAX_CONCURRENT {
                report.spawned = Some(self.spawn(downloads));
            }
        }

        let progress_due = *self.last_progress.get_or_insert(now);
        if now.duration_since(progress_due) >= PROGRESS_INTERVAL {
            self.last_progress = Some(now);
            report.completed = self.advance(downloads);
        }

        report
    }

    fn spawn(&mut self, downloads: &mut Downloads) -> String {
        let (file_name, size) = MOCK_FILES[self.rng.gen_range(0..MOCK_FILES.len())];
        log::debug!("Starting mock download {}", file_name);
        downloads.add(
            file_name,
            format!("https://example.com/downloads/{}", file_name),
            size,
        )
    }

    fn advance(&mut self, downloads: &mut Downloads) -> usize {
        let running: Vec<(String, f64)> = downloads
            .all()
            .iter()
            .filter(|d| d.status == DownloadStatus::InProgress)
            .map(|d| (d.id.clone(), d.progress))
            .collect();

        let mut completed = 0;
        for (id, progress) in running {
            let next = (progress + self.rng.gen_range(0.0..MAX_STEP)).min(100.0);
            if next >= 100.0 {
                downloads.update(&id, Some(100.0), Some(DownloadStatus::Completed));
                completed += 1;
            } else {
                downloads.update(&id, Some(next), None);
            }
        }
        completed
    }
}
