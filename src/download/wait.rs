//! Wait-time policy: how long to pause after an attempt.
//!
//! The policy is a pure function of an [`AttemptOutcome`] (plus the current
//! time, for reset timestamps). Rules are evaluated in priority order and the
//! first match wins:
//!
//! | # | Condition | Wait |
//! |---|-----------|------|
//! | 1 | outcome is a skip | 0 |
//! | 2 | `Retry-After` known and > 0 | `min(retry_after, MAX_WAIT)` |
//! | 3 | remaining > 0 and reset > 0, both known | reset window / remaining |
//! | 4 | status is 429, 503, or a connection error | `2^attempt` seconds |
//! | 5 | any other unsuccessful attempt | `2^attempt` seconds |
//! | 6 | otherwise | 0 |
//!
//! A reset value above [`EPOCH_THRESHOLD`] is read as a Unix timestamp; smaller
//! values are relative seconds. That split is a heuristic matching common
//! providers, not a header contract.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use bulk_downloader_core::download::{AttemptOutcome, RateLimits, wait_time};
//!
//! let outcome = AttemptOutcome::response("https://example.com/a.csv", 429, RateLimits::blank(), 3);
//! assert_eq!(wait_time(&outcome), Duration::from_secs(8));
//! ```

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::trace;

use super::constants::{EPOCH_THRESHOLD, MAX_WAIT};
use super::outcome::AttemptOutcome;

/// Computes the pause before the next attempt, using the system clock.
#[must_use]
pub fn wait_time(outcome: &AttemptOutcome) -> Duration {
    wait_time_at(outcome, SystemTime::now())
}

/// Computes the pause before the next attempt as of `now`.
#[must_use]
pub fn wait_time_at(outcome: &AttemptOutcome, now: SystemTime) -> Duration {
    if outcome.skip {
        return Duration::ZERO;
    }

    let limits = &outcome.rate_limits;

    if let Some(seconds) = limits.retry_after.positive() {
        #[allow(clippy::cast_sign_loss)]
        let requested = Duration::from_secs(seconds as u64);
        trace!(seconds, "waiting as instructed by Retry-After");
        return requested.min(MAX_WAIT);
    }

    if let (Some(remaining), Some(reset)) = (
        limits.remaining.positive(),
        limits.reset_after.positive(),
    ) {
        let wait = spread_over_window(remaining, reset, now);
        trace!(remaining, reset, wait_ms = wait.as_millis(), "spreading remaining quota");
        return wait;
    }

    if outcome.status.is_overload() || (!outcome.success && outcome.attempt_number > 0) {
        return exponential_backoff(outcome.attempt_number);
    }

    Duration::ZERO
}

/// Divides the time left in the rate-limit window evenly across the calls
/// still permitted.
#[allow(clippy::cast_precision_loss)]
fn spread_over_window(remaining: i64, reset: i64, now: SystemTime) -> Duration {
    let window_secs = if reset > EPOCH_THRESHOLD {
        let now_secs = now
            .duration_since(UNIX_EPOCH)
            .map_or(0.0, |elapsed| elapsed.as_secs_f64());
        reset as f64 - now_secs
    } else {
        reset as f64
    };

    let per_call = window_secs / remaining as f64;
    if !per_call.is_finite() || per_call <= 0.0 {
        return Duration::ZERO;
    }
    Duration::from_secs_f64(per_call.min(MAX_WAIT.as_secs_f64()))
}

/// `2^attempt` seconds, capped at [`MAX_WAIT`].
fn exponential_backoff(attempt: u32) -> Duration {
    2u64.checked_pow(attempt)
        .map_or(MAX_WAIT, Duration::from_secs)
        .min(MAX_WAIT)
}
