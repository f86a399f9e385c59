//! URL list loading.
//!
//! The input is a plain text file with one URL per line. Lines are trimmed;
//! blank lines and lines starting with `#` are ignored.

use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors that can occur while loading the URL list.
#[derive(Debug, Error)]
pub enum InputError {
    /// The URL file could not be read.
    #[error("cannot read URL file {path}: {source}")]
    Io {
        /// The file that failed to read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl InputError {
    /// Creates an IO error for the given path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Reads a URL file and returns its URLs in file order.
///
/// # Errors
///
/// Returns [`InputError::Io`] if the file cannot be read or is not UTF-8.
#[instrument(level = "debug", fields(path = %path.display()))]
pub fn read_url_file(path: &Path) -> Result<Vec<String>, InputError> {
    let text = std::fs::read_to_string(path).map_err(|e| InputError::io(path, e))?;
    let urls = parse_url_list(&text);
    debug!(url_count = urls.len(), "loaded URL file");
    Ok(urls)
}

/// Splits text into URLs, one per non-blank, non-comment line.
///
/// # Examples
///
/// ```
/// use bulk_downloader_core::parse_url_list;
///
/// let urls = parse_url_list("# list\nhttps://a.com/x.csv\n\n  https://a.com/y.csv  \n");
/// assert_eq!(urls, vec!["https://a.com/x.csv", "https://a.com/y.csv"]);
/// ```
#[must_use]
pub fn parse_url_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(ToString::to_string)
        .collect()
}

/// Shuffles URLs in place, for spreading load across hosts or paths.
pub fn shuffle_urls(urls: &mut [String]) {
    urls.shuffle(&mut rand::thread_rng());
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    #[test]
    fn test_parse_url_list_trims_and_skips_blank_lines() {
        let urls = parse_url_list("  https://a.com/1.txt\n\n\t\nhttps://a.com/2.txt\r\n");
        assert_eq!(urls, vec!["https://a.com/1.txt", "https://a.com/2.txt"]);
    }

    #[test]
    fn test_parse_url_list_skips_comments() {
        let urls = parse_url_list("# header\n  # indented comment\nhttps://a.com/1.txt\n");
        assert_eq!(urls, vec!["https://a.com/1.txt"]);
    }

    #[test]
    fn test_parse_url_list_keeps_duplicates_and_order() {
        let urls = parse_url_list("https://b.com/2.txt\nhttps://a.com/1.txt\nhttps://b.com/2.txt");
        assert_eq!(
            urls,
            vec!["https://b.com/2.txt", "https://a.com/1.txt", "https://b.com/2.txt"]
        );
    }

    #[test]
    fn test_parse_url_list_empty_input() {
        assert!(parse_url_list("").is_empty());
        assert!(parse_url_list("\n\n# only comments\n").is_empty());
    }

    #[test]
    fn test_read_url_file_reads_lines() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("urls.txt");
        std::fs::write(&file, "https://a.com/1.txt\nhttps://a.com/2.txt\n").unwrap();

        let urls = read_url_file(&file).unwrap();
        assert_eq!(urls.len(), 2);
    }

    #[test]
    fn test_read_url_file_missing_file_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.txt");

        let error = read_url_file(&missing).unwrap_err();
        assert!(error.to_string().contains("nope.txt"), "got {error}");
    }

    #[test]
    fn test_shuffle_urls_keeps_the_same_set() {
        let mut urls: Vec<String> = (0..50).map(|i| format!("https://a.com/{i}.txt")).collect();
        let mut expected = urls.clone();
        shuffle_urls(&mut urls);

        urls.sort();
        expected.sort();
        assert_eq!(urls, expected);
    }
}
