//! Rate-limit signal extraction from HTTP response headers.
//!
//! Servers spell their quota headers many ways (`X-RateLimit-Remaining`,
//! `RateLimit-Remaining`, `X-Rate-Limit-Remaining`, ...). Each logical signal
//! is matched by a case-insensitive pattern that tolerates an optional `X-`
//! prefix and optional hyphens between words.
//!
//! # Example
//!
//! ```
//! use bulk_downloader_core::download::rate_limits::{RateLimits, retry_after};
//! use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};
//!
//! let mut headers = HeaderMap::new();
//! headers.insert(RETRY_AFTER, HeaderValue::from_static("30"));
//!
//! let signal = retry_after(&headers);
//! assert!(signal.known);
//! assert_eq!(signal.value, 30);
//! assert!(!RateLimits::from_headers(&headers).remaining.known);
//! ```

use std::sync::LazyLock;

use regex::Regex;
use reqwest::header::HeaderMap;
use serde::Serialize;
use tracing::trace;

#[allow(clippy::expect_used)]
static REMAINING_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:x-)?rate-?limit-?remaining$").expect("remaining regex is valid") // Static pattern, safe to panic
});

#[allow(clippy::expect_used)]
static LIMIT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:x-)?rate-?limit-?limit$").expect("limit regex is valid") // Static pattern, safe to panic
});

#[allow(clippy::expect_used)]
static RETRY_AFTER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:x-)?retry-?after$").expect("retry-after regex is valid") // Static pattern, safe to panic
});

#[allow(clippy::expect_used)]
static RESET_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:x-)?rate-?limit-?reset$").expect("reset regex is valid") // Static pattern, safe to panic
});

/// A single numeric rate-limit fact and whether the server actually sent it.
///
/// `0` is a legitimate known value (e.g. `Retry-After: 0`), so absence is
/// carried by `known` rather than by a sentinel number. An unknown signal
/// always has `value == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct QuotaSignal {
    /// Parsed header value, or 0 when unknown.
    pub value: i64,
    /// True only when the header was present and integer-parseable.
    pub known: bool,
}

impl QuotaSignal {
    /// The signal for a missing or unparseable header.
    pub const UNKNOWN: Self = Self {
        value: 0,
        known: false,
    };

    /// Creates a signal observed with the given value.
    #[must_use]
    pub const fn known(value: i64) -> Self {
        Self { value, known: true }
    }

    /// Returns the value when the signal is known and strictly positive.
    #[must_use]
    pub fn positive(self) -> Option<i64> {
        (self.known && self.value > 0).then_some(self.value)
    }
}

/// Snapshot of the rate-limit signals carried by one response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RateLimits {
    /// Calls still permitted in the current window.
    pub remaining: QuotaSignal,
    /// Ceiling of calls per window.
    pub limit: QuotaSignal,
    /// Seconds the server asked us to wait.
    pub retry_after: QuotaSignal,
    /// Window reset marker: relative seconds or a Unix timestamp.
    pub reset_after: QuotaSignal,
}

impl RateLimits {
    /// All-unknown signals, used for outcomes that never saw a response.
    #[must_use]
    pub const fn blank() -> Self {
        Self {
            remaining: QuotaSignal::UNKNOWN,
            limit: QuotaSignal::UNKNOWN,
            retry_after: QuotaSignal::UNKNOWN,
            reset_after: QuotaSignal::UNKNOWN,
        }
    }

    /// Extracts all four signals from a response's headers.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            remaining: remaining(headers),
            limit: limit(headers),
            retry_after: retry_after(headers),
            reset_after: reset_after(headers),
        }
    }

    /// Returns true when no signal was observed.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        *self == Self::blank()
    }
}

/// Remaining-quota signal (`X-RateLimit-Remaining` and friends).
#[must_use]
pub fn remaining(headers: &HeaderMap) -> QuotaSignal {
    find_signal(headers, &REMAINING_PATTERN)
}

/// Quota ceiling signal (`X-RateLimit-Limit` and friends).
#[must_use]
pub fn limit(headers: &HeaderMap) -> QuotaSignal {
    find_signal(headers, &LIMIT_PATTERN)
}

/// Retry-After signal, in seconds. HTTP-date values are treated as absent.
#[must_use]
pub fn retry_after(headers: &HeaderMap) -> QuotaSignal {
    find_signal(headers, &RETRY_AFTER_PATTERN)
}

/// Window reset signal (`X-RateLimit-Reset` and friends).
#[must_use]
pub fn reset_after(headers: &HeaderMap) -> QuotaSignal {
    find_signal(headers, &RESET_PATTERN)
}

/// The first header whose name matches decides the signal; which one that is
/// among several matches follows the map's iteration order.
fn find_signal(headers: &HeaderMap, pattern: &Regex) -> QuotaSignal {
    let Some((name, value)) = headers
        .iter()
        .find(|(name, _)| pattern.is_match(name.as_str()))
    else {
        return QuotaSignal::UNKNOWN;
    };

    match value
        .to_str()
        .ok()
        .and_then(|raw| raw.trim().parse::<i64>().ok())
    {
        Some(parsed) => QuotaSignal::known(parsed),
        None => {
            trace!(header = %name, ?value, "non-numeric rate-limit header, treating as absent");
            QuotaSignal::UNKNOWN
        }
    }
}
