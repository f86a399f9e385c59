//! Per-attempt outcome records.

use std::fmt;

use super::rate_limits::RateLimits;

/// Status code reported for attempts whose transport failed before any
/// response arrived. Outside the range of real HTTP status codes.
pub const CONNECTION_ERROR: i32 = -1;

/// How an attempt ended at the transport level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptStatus {
    /// No request was made (local skip or validation failure).
    NotAttempted,
    /// A response arrived with this HTTP status code.
    Http(u16),
    /// Timeout, refused connection, DNS failure, or a body that broke off mid-stream.
    ConnectionError,
}

impl AttemptStatus {
    /// Numeric form used in logs: the HTTP code, 0 when not attempted, or
    /// [`CONNECTION_ERROR`].
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Self::NotAttempted => 0,
            Self::Http(status) => i32::from(status),
            Self::ConnectionError => CONNECTION_ERROR,
        }
    }

    /// True for statuses that signal overload: 429, 503, or a failed connection.
    #[must_use]
    pub fn is_overload(self) -> bool {
        matches!(self, Self::Http(429 | 503) | Self::ConnectionError)
    }
}

impl fmt::Display for AttemptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAttempted => f.write_str("not-attempted"),
            Self::Http(status) => write!(f, "{status}"),
            Self::ConnectionError => f.write_str("connection-error"),
        }
    }
}

/// Result of one fetch attempt, or of a skip decision made before any fetch.
///
/// `skip == true` means no further attempt is meaningful for this URL: either
/// the file already exists or the destination can never be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptOutcome {
    /// The URL this attempt was for.
    pub url: String,
    /// True when the server answered 2xx (or the file was already present).
    pub success: bool,
    /// Transport-level status of the attempt.
    pub status: AttemptStatus,
    /// Signals parsed from the response headers; blank without a response.
    pub rate_limits: RateLimits,
    /// True when retrying cannot change the result.
    pub skip: bool,
    /// 1-based attempt counter.
    pub attempt_number: u32,
}

impl AttemptOutcome {
    /// Destination file already on disk; nothing to fetch.
    #[must_use]
    pub fn already_present(url: impl Into<String>, attempt_number: u32) -> Self {
        Self {
            url: url.into(),
            success: true,
            status: AttemptStatus::Http(200),
            rate_limits: RateLimits::blank(),
            skip: true,
            attempt_number,
        }
    }

    /// URL or destination path is unusable; nothing to fetch.
    #[must_use]
    pub fn invalid(url: impl Into<String>, attempt_number: u32) -> Self {
        Self {
            url: url.into(),
            success: false,
            status: AttemptStatus::NotAttempted,
            rate_limits: RateLimits::blank(),
            skip: true,
            attempt_number,
        }
    }

    /// The request never produced a usable response.
    #[must_use]
    pub fn connection_error(url: impl Into<String>, attempt_number: u32) -> Self {
        Self {
            url: url.into(),
            success: false,
            status: AttemptStatus::ConnectionError,
            rate_limits: RateLimits::blank(),
            skip: false,
            attempt_number,
        }
    }

    /// A response arrived; success is decided by the 2xx range.
    #[must_use]
    pub fn response(
        url: impl Into<String>,
        status: u16,
        rate_limits: RateLimits,
        attempt_number: u32,
    ) -> Self {
        Self {
            url: url.into(),
            success: (200..300).contains(&status),
            status: AttemptStatus::Http(status),
            rate_limits,
            skip: false,
            attempt_number,
        }
    }

    /// True when the attempt loop for this URL should stop.
    #[must_use]
    pub fn is_final(&self) -> bool {
        self.success || self.skip
    }
}
