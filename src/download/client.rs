//! HTTP client wrapper for fetching URLs and streaming bodies to disk.
//!
//! Each attempt issues one fresh GET; idle connections are not kept between
//! attempts. Response bodies are streamed through an 8 KiB buffer into a file
//! that is opened create-new, so an existing file is never overwritten.

use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, instrument};

use super::constants::{CHUNK_SIZE, CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use super::error::DownloadError;
use crate::user_agent;

/// Timeouts and identity for the HTTP client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds (covers streaming the body).
    pub read_timeout_secs: u64,
    /// User-Agent header value.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            read_timeout_secs: READ_TIMEOUT_SECS,
            user_agent: user_agent::default_download_user_agent(),
        }
    }
}

/// HTTP client for single-shot streamed GET requests.
///
/// # Example
///
/// ```no_run
/// use bulk_downloader_core::download::{ClientConfig, HttpClient};
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new(&ClientConfig::default())?;
/// let response = client.fetch("https://example.com/data/file.csv").await?;
/// if response.status().is_success() {
///     let bytes = HttpClient::save_body(
///         response,
///         "https://example.com/data/file.csv",
///         Path::new("./downloads/data/file.csv"),
///     )
///     .await?;
///     println!("wrote {bytes} bytes");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Builds a client with the given timeouts and User-Agent.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::ClientBuild`] if reqwest rejects the configuration
    /// (for example, when no TLS backend can be initialised).
    pub fn new(config: &ClientConfig) -> Result<Self, DownloadError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.read_timeout_secs))
            .pool_max_idle_per_host(0)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|source| DownloadError::ClientBuild { source })?;
        Ok(Self { client })
    }

    /// Sends a GET request and returns the response whatever its status.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Timeout`] or [`DownloadError::Network`] when no
    /// response arrives. Non-2xx responses are returned as `Ok`.
    #[instrument(level = "debug", skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<reqwest::Response, DownloadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::transport(url, e))?;
        debug!(status = response.status().as_u16(), "response received");
        Ok(response)
    }

    /// Streams a response body into `path`, creating parent directories.
    ///
    /// The file is created exclusively; if anything goes wrong after it was
    /// created, the partial file is removed so a later run does not mistake it
    /// for a finished download.
    ///
    /// # Errors
    ///
    /// - [`DownloadError::PartialWrite`] when the directory, file, or a chunk
    ///   cannot be written (including when the file already exists)
    /// - [`DownloadError::Network`] or [`DownloadError::Timeout`] when the body
    ///   breaks off mid-stream
    #[instrument(level = "debug", skip(response), fields(path = %path.display()))]
    pub async fn save_body(
        response: reqwest::Response,
        url: &str,
        path: &Path,
    ) -> Result<u64, DownloadError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DownloadError::partial_write(path, 0, e))?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await
            .map_err(|e| DownloadError::partial_write(path, 0, e))?;

        let result = stream_to_file(file, response, url, path).await;
        if result.is_err() {
            debug!("cleaning up partial file after error");
            let _ = tokio::fs::remove_file(path).await;
        }
        result
    }
}

/// Streams response body to file, returning bytes written.
async fn stream_to_file(
    file: File,
    response: reqwest::Response,
    url: &str,
    path: &Path,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::with_capacity(CHUNK_SIZE, file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::transport(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::partial_write(path, bytes_written, e))?;

        bytes_written += chunk.len() as u64;
    }

    // Ensure all data is flushed to disk
    writer
        .flush()
        .await
        .map_err(|e| DownloadError::partial_write(path, bytes_written, e))?;

    Ok(bytes_written)
}
