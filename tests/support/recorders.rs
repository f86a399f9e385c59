//! Sleeper and reporter doubles that record what the engine asked for.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bulk_downloader_core::{AttemptOutcome, DownloadError, Reporter, RunStats, Sleeper};

/// Records every requested pause instead of serving it.
#[derive(Clone, Default)]
pub struct RecordingSleeper {
    waits: Arc<Mutex<Vec<Duration>>>,
}

#[allow(dead_code)]
impl RecordingSleeper {
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().unwrap().clone()
    }

    pub fn waits_secs(&self) -> Vec<u64> {
        self.waits().iter().map(Duration::as_secs).collect()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.waits.lock().unwrap().push(duration);
    }
}

/// One attempt as seen by the reporter.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct ReportedAttempt {
    pub outcome: AttemptOutcome,
    pub wait: Duration,
    pub error: Option<String>,
}

#[derive(Default)]
struct Events {
    started: Vec<(usize, usize, String)>,
    attempts: Vec<ReportedAttempt>,
    saved: Vec<(String, PathBuf, u64)>,
    abandoned: Vec<(String, u32)>,
    finished: Option<RunStats>,
}

/// Captures engine events for assertions.
#[derive(Clone, Default)]
pub struct RecordingReporter {
    events: Arc<Mutex<Events>>,
}

#[allow(dead_code)]
impl RecordingReporter {
    pub fn started(&self) -> Vec<(usize, usize, String)> {
        self.events.lock().unwrap().started.clone()
    }

    pub fn attempts(&self) -> Vec<ReportedAttempt> {
        self.events.lock().unwrap().attempts.clone()
    }

    pub fn saved(&self) -> Vec<(String, PathBuf, u64)> {
        self.events.lock().unwrap().saved.clone()
    }

    pub fn abandoned(&self) -> Vec<(String, u32)> {
        self.events.lock().unwrap().abandoned.clone()
    }

    pub fn finished(&self) -> Option<RunStats> {
        self.events.lock().unwrap().finished
    }
}

impl Reporter for RecordingReporter {
    fn url_started(&self, position: usize, total: usize, url: &str) {
        self.events
            .lock()
            .unwrap()
            .started
            .push((position, total, url.to_string()));
    }

    fn attempt_finished(
        &self,
        outcome: &AttemptOutcome,
        wait: Duration,
        error: Option<&DownloadError>,
    ) {
        self.events.lock().unwrap().attempts.push(ReportedAttempt {
            outcome: outcome.clone(),
            wait,
            error: error.map(ToString::to_string),
        });
    }

    fn file_saved(&self, url: &str, path: &Path, bytes: u64) {
        self.events
            .lock()
            .unwrap()
            .saved
            .push((url.to_string(), path.to_path_buf(), bytes));
    }

    fn url_abandoned(&self, url: &str, attempts: u32) {
        self.events
            .lock()
            .unwrap()
            .abandoned
            .push((url.to_string(), attempts));
    }

    fn run_finished(&self, stats: &RunStats) {
        self.events.lock().unwrap().finished = Some(*stats);
    }
}
