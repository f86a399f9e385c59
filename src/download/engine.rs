//! Sequential download engine with per-URL retry loop.
//!
//! This module provides the [`DownloadEngine`], which walks a URL list in
//! order and, for each URL, runs attempts until one succeeds, the URL turns out
//! to need no download (file present, or no legal destination), or the retry
//! ceiling is reached.
//!
//! # Overview
//!
//! Each attempt:
//! 1. Resolves the destination path; an existing file or an invalid
//!    URL/path ends the URL without a request
//! 2. Issues one streamed GET
//! 3. Parses rate-limit headers and writes a 2xx body to disk
//! 4. Asks the wait-time policy how long to pause, and pauses
//!
//! Failures on one URL never abort the batch.
//!
//! # Example
//!
//! ```no_run
//! use bulk_downloader_core::download::{ClientConfig, DownloadEngine, EngineConfig, HttpClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = EngineConfig::new("./downloads")
//!     .with_prefixes(vec!["/bulk-files/".to_string()])
//!     .with_max_tries(5);
//! let engine = DownloadEngine::new(config);
//! let client = HttpClient::new(&ClientConfig::default())?;
//! let urls = vec!["https://example.com/bulk-files/2024/a.csv".to_string()];
//! let stats = engine.run(&client, &urls).await;
//! println!("existing: {}, succeeded: {}, failed: {}", stats.existing_count, stats.success_count, stats.failure_count);
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::HttpClient;
use super::constants::DEFAULT_MAX_TRIES;
use super::error::DownloadError;
use super::outcome::{AttemptOutcome, AttemptStatus};
use super::path::{Destination, resolve_destination};
use super::rate_limits::RateLimits;
use super::report::{Reporter, TracingReporter};
use super::sleeper::{Sleeper, TokioSleeper};
use super::wait::wait_time;

/// Settings for a batch run.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Root directory that URL paths are mapped under.
    pub download_dir: PathBuf,
    /// Prefixes stripped from each URL path, in order.
    pub prefixes: Vec<String>,
    /// Attempts per URL, including the first (at least 1).
    pub max_tries: u32,
    /// Extra pause after each freshly written file, on top of the wait policy.
    pub pause_after_download: Duration,
}

impl EngineConfig {
    /// Creates a config writing under `download_dir` with default retry settings.
    #[must_use]
    pub fn new(download_dir: impl Into<PathBuf>) -> Self {
        Self {
            download_dir: download_dir.into(),
            prefixes: Vec::new(),
            max_tries: DEFAULT_MAX_TRIES,
            pause_after_download: Duration::ZERO,
        }
    }

    /// Sets the prefixes stripped from URL paths.
    #[must_use]
    pub fn with_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.prefixes = prefixes;
        self
    }

    /// Sets the attempt ceiling; values below 1 are raised to 1.
    #[must_use]
    pub fn with_max_tries(mut self, max_tries: u32) -> Self {
        self.max_tries = max_tries.max(1);
        self
    }

    /// Sets the pause taken after each freshly written file.
    #[must_use]
    pub fn with_pause_after_download(mut self, pause: Duration) -> Self {
        self.pause_after_download = pause;
        self
    }
}

/// Outcome counts for a batch run.
///
/// Updated once per attempt resolution and never decremented. `failure_count`
/// counts failed attempts, so one URL retried three times adds three.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Files downloaded and written in full.
    pub success_count: usize,
    /// Attempts that failed: transport errors, non-2xx responses, write failures.
    pub failure_count: usize,
    /// URLs whose destination file was already on disk.
    pub existing_count: usize,
    /// URLs skipped because the URL or its derived filename is unusable.
    pub invalid_count: usize,
    /// URLs given up on after exhausting every attempt.
    pub abandoned_count: usize,
}

/// What a single attempt produced, beyond the outcome record itself.
struct AttemptResult {
    outcome: AttemptOutcome,
    error: Option<DownloadError>,
    saved: Option<(PathBuf, u64)>,
}

impl AttemptResult {
    fn new(outcome: AttemptOutcome) -> Self {
        Self {
            outcome,
            error: None,
            saved: None,
        }
    }

    fn with_error(outcome: AttemptOutcome, error: DownloadError) -> Self {
        Self {
            outcome,
            error: Some(error),
            saved: None,
        }
    }
}

/// Sequential download engine.
///
/// One URL, one attempt, one request at a time. Pauses go through the
/// configured [`Sleeper`]; progress goes to the configured [`Reporter`].
pub struct DownloadEngine {
    config: EngineConfig,
    reporter: Box<dyn Reporter>,
    sleeper: Box<dyn Sleeper>,
}

impl std::fmt::Debug for DownloadEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DownloadEngine {
    /// Creates an engine that reports through `tracing` and sleeps on the tokio timer.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let config = EngineConfig {
            max_tries: config.max_tries.max(1),
            ..config
        };
        debug!(
            download_dir = %config.download_dir.display(),
            prefixes = ?config.prefixes,
            max_tries = config.max_tries,
            "creating download engine"
        );
        Self {
            config,
            reporter: Box::new(TracingReporter),
            sleeper: Box::new(TokioSleeper),
        }
    }

    /// Replaces the reporter.
    #[must_use]
    pub fn with_reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    /// Replaces the sleeper.
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.sleeper = Box::new(sleeper);
        self
    }

    /// Returns the engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Processes every URL in order and returns the tally.
    ///
    /// Never fails: per-URL errors are contained in that URL's attempt loop.
    #[instrument(skip(self, client, urls), fields(url_count = urls.len()))]
    pub async fn run<S: AsRef<str>>(&self, client: &HttpClient, urls: &[S]) -> RunStats {
        let mut stats = RunStats::default();
        let total = urls.len();

        for (index, url) in urls.iter().enumerate() {
            let url = url.as_ref();
            self.reporter.url_started(index + 1, total, url);
            self.download_url(client, url, &mut stats).await;
        }

        self.reporter.run_finished(&stats);
        stats
    }

    /// Runs the attempt loop for one URL and returns its last outcome.
    #[instrument(skip(self, client, stats))]
    pub async fn download_url(
        &self,
        client: &HttpClient,
        url: &str,
        stats: &mut RunStats,
    ) -> AttemptOutcome {
        let mut attempt_number = 0u32;
        let mut last_attempt: Option<Instant> = None;

        loop {
            attempt_number += 1;
            if let Some(previous) = last_attempt {
                debug!(
                    attempt_number,
                    since_last_attempt_secs = previous.elapsed().as_secs_f64(),
                    "retrying URL"
                );
            }
            last_attempt = Some(Instant::now());

            let AttemptResult {
                outcome,
                error,
                saved,
            } = self.attempt(client, url, attempt_number, stats).await;

            let wait = wait_time(&outcome);
            if let Some((path, bytes)) = &saved {
                self.reporter.file_saved(url, path, *bytes);
            }
            self.reporter.attempt_finished(&outcome, wait, error.as_ref());
            self.sleeper.sleep(wait).await;

            if saved.is_some() && !self.config.pause_after_download.is_zero() {
                self.sleeper.sleep(self.config.pause_after_download).await;
            }

            if outcome.is_final() {
                return outcome;
            }

            if attempt_number >= self.config.max_tries {
                stats.abandoned_count += 1;
                self.reporter.url_abandoned(url, attempt_number);
                return outcome;
            }
        }
    }

    /// Runs a single attempt and updates the tally for it.
    async fn attempt(
        &self,
        client: &HttpClient,
        url: &str,
        attempt_number: u32,
        stats: &mut RunStats,
    ) -> AttemptResult {
        let path = match resolve_destination(url, &self.config.download_dir, &self.config.prefixes)
        {
            Destination::File(path) => path,
            Destination::InvalidUrl => {
                stats.invalid_count += 1;
                return AttemptResult::with_error(
                    AttemptOutcome::invalid(url, attempt_number),
                    DownloadError::invalid_url(url),
                );
            }
            Destination::InvalidFilename(path) => {
                stats.invalid_count += 1;
                return AttemptResult::with_error(
                    AttemptOutcome::invalid(url, attempt_number),
                    DownloadError::invalid_destination(url, path),
                );
            }
        };

        match tokio::fs::try_exists(&path).await {
            Ok(true) => {
                stats.existing_count += 1;
                return AttemptResult::new(AttemptOutcome::already_present(url, attempt_number));
            }
            Ok(false) => {}
            Err(e) => {
                // Nothing could be written there either, so skip the request.
                warn!(path = %path.display(), error = %e, "cannot check destination");
                stats.failure_count += 1;
                return AttemptResult::with_error(
                    AttemptOutcome::invalid(url, attempt_number),
                    DownloadError::destination_unavailable(path, e),
                );
            }
        }

        let response = match client.fetch(url).await {
            Ok(response) => response,
            Err(e) => {
                stats.failure_count += 1;
                return AttemptResult::with_error(
                    AttemptOutcome::connection_error(url, attempt_number),
                    e,
                );
            }
        };

        let status = response.status().as_u16();
        let rate_limits = RateLimits::from_headers(response.headers());
        let outcome = AttemptOutcome::response(url, status, rate_limits, attempt_number);
        debug!(status, ?rate_limits, "classified response");

        if !outcome.success {
            stats.failure_count += 1;
            return AttemptResult::with_error(outcome, DownloadError::http_status(url, status));
        }

        match HttpClient::save_body(response, url, &path).await {
            Ok(bytes) => {
                stats.success_count += 1;
                AttemptResult {
                    outcome,
                    error: None,
                    saved: Some((path, bytes)),
                }
            }
            Err(e) if e.is_transport() => {
                // The body broke off: same footing as a failed connection.
                stats.failure_count += 1;
                let outcome = AttemptOutcome {
                    status: AttemptStatus::ConnectionError,
                    success: false,
                    ..outcome
                };
                AttemptResult::with_error(outcome, e)
            }
            Err(e) => {
                // Local disk trouble: the server side is fine and a retry
                // would not help, so the HTTP-level success stands.
                stats.failure_count += 1;
                AttemptResult::with_error(outcome, e)
            }
        }
    }
}
