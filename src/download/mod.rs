//! Download engine for fetching a URL list to disk.
//!
//! This module turns each attempt's outcome (status code, rate-limit headers,
//! transport failures) into a wait time and a retry/skip decision, and drives
//! the sequential per-URL attempt loop.
//!
//! # Features
//!
//! - Flexible rate-limit header matching (`X-RateLimit-Remaining`,
//!   `Rate-Limit-Remaining`, `ratelimitremaining`, ...)
//! - Retry-After honoring, quota spreading, and exponential backoff
//! - Local path derivation with prefix stripping and filename validation
//! - Streaming downloads in 8 KiB chunks; existing files are never overwritten
//!
//! # Example
//!
//! ```no_run
//! use bulk_downloader_core::download::{
//!     ClientConfig, DownloadEngine, EngineConfig, HttpClient,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new(&ClientConfig::default())?;
//! let engine = DownloadEngine::new(EngineConfig::new("./downloads"));
//! let urls = vec!["https://example.com/data/file.csv".to_string()];
//! let stats = engine.run(&client, &urls).await;
//! println!("succeeded: {}", stats.success_count);
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod engine;
mod error;
mod outcome;
pub mod path;
pub mod rate_limits;
mod report;
mod sleeper;
pub mod wait;

pub use client::{ClientConfig, HttpClient};
pub use constants::{CHUNK_SIZE, DEFAULT_MAX_TRIES, EPOCH_THRESHOLD, MAX_WAIT};
pub use engine::{DownloadEngine, EngineConfig, RunStats};
pub use error::DownloadError;
pub use outcome::{AttemptOutcome, AttemptStatus, CONNECTION_ERROR};
pub use path::{Destination, has_valid_filename, longest_common_prefix, resolve_destination};
pub use rate_limits::{QuotaSignal, RateLimits};
pub use report::{Reporter, TracingReporter};
pub use sleeper::{Sleeper, TokioSleeper};
pub use wait::{wait_time, wait_time_at};

// Note: we do NOT define module-local Result aliases.
// Use `Result<T, DownloadError>` explicitly in function signatures.
