//! Pausing between attempts.
//!
//! The engine never calls `tokio::time::sleep` directly; it goes through a
//! [`Sleeper`] so callers can show progress while waiting, and tests can record
//! waits instead of serving them.

use std::time::Duration;

use async_trait::async_trait;

/// Something that can suspend the download loop for a while.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Suspends for `duration`. A zero duration should return immediately.
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}
