//! Reporting capability handed to the download engine.
//!
//! The engine reports every attempt and the final tally through a [`Reporter`]
//! instead of writing to a process-wide logger setup of its own. The default
//! [`TracingReporter`] turns those events into structured `tracing` lines.

use std::path::Path;
use std::time::Duration;

use tracing::{info, warn};

use super::engine::RunStats;
use super::error::DownloadError;
use super::outcome::{AttemptOutcome, AttemptStatus};

/// Receives progress events from the download engine.
pub trait Reporter: Send + Sync {
    /// A URL is about to be processed (`position` is 1-based).
    fn url_started(&self, position: usize, total: usize, url: &str);

    /// An attempt resolved. `wait` is the pause that follows it; `error` holds
    /// the failure detail when there was one.
    fn attempt_finished(
        &self,
        outcome: &AttemptOutcome,
        wait: Duration,
        error: Option<&DownloadError>,
    );

    /// A body was written to disk in full.
    fn file_saved(&self, url: &str, path: &Path, bytes: u64);

    /// A URL used up every attempt without success.
    fn url_abandoned(&self, url: &str, attempts: u32);

    /// The whole batch is done.
    fn run_finished(&self, stats: &RunStats);
}

/// Reports through `tracing` events: one line per attempt and a summary.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn url_started(&self, position: usize, total: usize, url: &str) {
        info!(
            position,
            total,
            percent = %format!("{:.2}", percent_complete(position, total)),
            url = %url,
            "processing URL"
        );
    }

    fn attempt_finished(
        &self,
        outcome: &AttemptOutcome,
        wait: Duration,
        error: Option<&DownloadError>,
    ) {
        let wait_secs = wait.as_secs_f64();
        match (outcome.skip, outcome.success, error) {
            (true, true, _) => info!(url = %outcome.url, "already exists, skipping"),
            (true, false, error) => warn!(
                url = %outcome.url,
                error = ?error.map(ToString::to_string),
                "cannot map URL to a local file, skipping"
            ),
            (false, true, None) => info!(
                url = %outcome.url,
                attempt = outcome.attempt_number,
                wait_secs,
                "downloaded"
            ),
            (false, _, error) => warn!(
                url = %outcome.url,
                attempt = outcome.attempt_number,
                status = %outcome.status,
                retry_after = outcome.rate_limits.retry_after.value,
                remaining = outcome.rate_limits.remaining.value,
                wait_secs,
                error = ?error.map(ToString::to_string),
                "attempt failed"
            ),
        }

        if wait >= Duration::from_secs(60) && outcome.status != AttemptStatus::NotAttempted {
            info!(url = %outcome.url, wait_secs, "long pause requested before next attempt");
        }
    }

    fn file_saved(&self, url: &str, path: &Path, bytes: u64) {
        info!(url = %url, path = %path.display(), bytes, "download complete");
    }

    fn url_abandoned(&self, url: &str, attempts: u32) {
        warn!(url = %url, attempts, "giving up on URL after exhausting attempts");
    }

    fn run_finished(&self, stats: &RunStats) {
        info!(
            existing = stats.existing_count,
            succeeded = stats.success_count,
            failed = stats.failure_count,
            invalid = stats.invalid_count,
            abandoned = stats.abandoned_count,
            "batch complete"
        );
    }
}

/// Share of the batch reached at `position`, as a percentage.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub(crate) fn percent_complete(position: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    position as f64 / total as f64 * 100.0
}
