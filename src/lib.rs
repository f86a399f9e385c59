//! Bulk Downloader Core Library
//!
//! This library fetches a list of URLs to local files, riding out transient
//! failures and server-imposed rate limits without manual intervention.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`download`] - Rate-limit header parsing, path resolution, wait-time
//!   policy, and the sequential download engine
//! - [`input`] - URL list loading and ordering

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod download;
pub mod input;
mod user_agent;

// Re-export commonly used types
pub use download::{
    AttemptOutcome, AttemptStatus, CONNECTION_ERROR, ClientConfig, DEFAULT_MAX_TRIES, Destination,
    DownloadEngine, DownloadError, EngineConfig, HttpClient, MAX_WAIT, QuotaSignal, RateLimits,
    Reporter, RunStats, Sleeper, TokioSleeper, TracingReporter, longest_common_prefix, wait_time,
};
pub use input::{InputError, parse_url_list, read_url_file, shuffle_urls};
