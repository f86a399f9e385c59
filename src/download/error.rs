//! Error types for the download module.
//!
//! These errors never escape a URL's attempt loop: the engine turns each one
//! into an [`AttemptOutcome`](super::AttemptOutcome) and moves on. They exist so
//! the loop and its logs can tell the failure kinds apart.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while fetching a single URL.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The URL has no scheme or host. Abandoned without retry.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// The derived local path is not a legal filename. Abandoned without retry.
    #[error("invalid destination {path} for {url}")]
    InvalidDestination {
        /// The URL whose path could not be mapped.
        url: String,
        /// The rejected local path.
        path: PathBuf,
    },

    /// Network-level error (DNS resolution, connection refused, TLS, body cut off).
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} downloading {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// Writing the body to disk failed mid-stream. Counted as failed, not retried.
    #[error("write failed for {path} after {bytes_written} bytes: {source}")]
    PartialWrite {
        /// The file path where the error occurred.
        path: PathBuf,
        /// Bytes that reached the file before the failure.
        bytes_written: u64,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The destination could not be checked on disk (permission denied, a
    /// file where a directory is expected). Counted as failed, not retried.
    #[error("cannot check destination {path}: {source}")]
    DestinationUnavailable {
        /// The destination that could not be inspected.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },
}

impl DownloadError {
    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates an invalid destination error.
    pub fn invalid_destination(url: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::InvalidDestination {
            url: url.into(),
            path: path.into(),
        }
    }

    /// Creates a transport error from a reqwest error, separating timeouts.
    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::timeout(url)
        } else {
            Self::Network {
                url: url.into(),
                source,
            }
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a partial write error.
    pub fn partial_write(
        path: impl Into<PathBuf>,
        bytes_written: u64,
        source: std::io::Error,
    ) -> Self {
        Self::PartialWrite {
            path: path.into(),
            bytes_written,
            source,
        }
    }

    /// Creates a destination-unavailable error.
    pub fn destination_unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DestinationUnavailable {
            path: path.into(),
            source,
        }
    }

    /// True for failures where the server may answer differently next time.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout { .. })
    }
}

// Note on From trait implementations:
// We intentionally do NOT implement `From<reqwest::Error>` or `From<std::io::Error>`
// because our error variants require context (url, path) that the source errors
// don't provide. The helper constructors are the way to build these errors.
