//! Constants for the download module (timeouts, retry ceilings, wait caps).

use std::time::Duration;

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes for large files).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Default number of attempts per URL, including the first.
pub const DEFAULT_MAX_TRIES: u32 = 10;

/// Upper bound on any single policy wait (1 hour).
pub const MAX_WAIT: Duration = Duration::from_secs(3600);

/// Reset header values above this are read as Unix timestamps, not relative seconds.
pub const EPOCH_THRESHOLD: i64 = 1_000_000_000;

/// Buffer size used when streaming response bodies to disk (8 KiB).
pub const CHUNK_SIZE: usize = 8 * 1024;
