//! Local path derivation for downloaded URLs.
//!
//! A URL maps to `download_root/<url path>` after configured prefixes are
//! stripped from the path. Every input produces a [`Destination`]; malformed
//! URLs and illegal filenames are explicit variants rather than absent values.

use std::path::{Component, Path, PathBuf};

use tracing::{debug, instrument};
use url::Url;

/// Where a URL's content should be written, or why it cannot be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// A legal file path under the download root.
    File(PathBuf),
    /// The URL lacks a scheme or a host.
    InvalidUrl,
    /// The derived path has no usable filename (missing name or extension,
    /// trailing slash, a parent-directory segment, or a control character).
    InvalidFilename(PathBuf),
}

impl Destination {
    /// Returns the file path when the destination is usable.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::InvalidUrl | Self::InvalidFilename(_) => None,
        }
    }
}

/// Resolves the local destination for `url`.
///
/// Each prefix is removed from the URL's path component in order (plain
/// substring removal of the first occurrence). A prefix given as an absolute
/// URL is reduced to its path first, so `https://host/base/` and `/base/`
/// behave the same.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use bulk_downloader_core::download::{Destination, resolve_destination};
///
/// let dest = resolve_destination(
///     "https://example.com/bulk/2024/data.csv",
///     Path::new("/tmp/out"),
///     &["/bulk/".to_string()],
/// );
/// assert_eq!(dest, Destination::File("/tmp/out/2024/data.csv".into()));
///
/// assert_eq!(
///     resolve_destination("example.com/data.csv", Path::new("/tmp/out"), &[]),
///     Destination::InvalidUrl
/// );
/// ```
#[must_use]
#[instrument(level = "debug", skip(download_root, prefixes))]
pub fn resolve_destination(url: &str, download_root: &Path, prefixes: &[String]) -> Destination {
    let Some(parsed) = Url::parse(url).ok().filter(|u| u.host_str().is_some()) else {
        debug!("URL has no scheme or host");
        return Destination::InvalidUrl;
    };

    let mut url_path = decode_path(parsed.path());

    for prefix in prefixes {
        let prefix = prefix_path(prefix);
        if !prefix.is_empty() {
            url_path = url_path.replacen(&prefix, "", 1);
        }
    }

    let relative = url_path.trim_start_matches('/');
    let candidate = download_root.join(relative);

    if !has_valid_filename(relative)
        || escapes_root(Path::new(relative))
        || relative.chars().any(char::is_control)
    {
        debug!(path = %candidate.display(), "derived path is not a legal filename");
        return Destination::InvalidFilename(candidate);
    }

    Destination::File(candidate)
}

/// Returns true when `path` ends in a non-empty base name with a non-empty
/// extension.
///
/// # Examples
///
/// ```
/// use bulk_downloader_core::download::has_valid_filename;
///
/// assert!(has_valid_filename("report.csv"));
/// assert!(has_valid_filename("/x/y/report.csv"));
/// assert!(!has_valid_filename("report"));
/// assert!(!has_valid_filename("report.csv/"));
/// ```
#[must_use]
pub fn has_valid_filename(path: &str) -> bool {
    if path.is_empty() || path.ends_with('/') || path.ends_with('\\') {
        return false;
    }
    let path = Path::new(path);
    let has_stem = path
        .file_stem()
        .is_some_and(|stem| !stem.is_empty());
    let has_extension = path
        .extension()
        .is_some_and(|extension| !extension.is_empty());
    has_stem && has_extension
}

/// Longest common prefix of the given URL paths, cut back to its last `/`.
///
/// Cutting at a separator keeps whole directory names and means a single path
/// never strips its own filename.
///
/// # Examples
///
/// ```
/// use bulk_downloader_core::download::longest_common_prefix;
///
/// assert_eq!(longest_common_prefix(&["/a/b/c.txt", "/a/b/d.txt"]), "/a/b/");
/// assert_eq!(longest_common_prefix::<&str>(&[]), "");
/// ```
#[must_use]
pub fn longest_common_prefix<S: AsRef<str>>(paths: &[S]) -> String {
    let Some((first, rest)) = paths.split_first() else {
        return String::new();
    };
    let first = first.as_ref();

    let mut common_len = first.len();
    for other in rest {
        let other = other.as_ref();
        common_len = first
            .char_indices()
            .zip(other.chars())
            .take_while(|((_, a), b)| a == b)
            .last()
            .map_or(0, |((idx, ch), _)| idx + ch.len_utf8())
            .min(common_len);
    }

    let common = &first[..common_len];
    common
        .rfind('/')
        .map_or_else(String::new, |idx| common[..=idx].to_string())
}

/// Decoded path components of each URL, for auto-prefix derivation. URLs
/// that do not parse are left out.
///
/// Paths are decoded the same way [`resolve_destination`] decodes them, so a
/// prefix computed from this list always lines up with the resolved path.
#[must_use]
pub fn url_paths<S: AsRef<str>>(urls: &[S]) -> Vec<String> {
    urls.iter()
        .filter_map(|url| Url::parse(url.as_ref()).ok())
        .filter(|url| url.host_str().is_some())
        .map(|url| decode_path(url.path()))
        .collect()
}

/// Percent-decodes a URL path, keeping the raw text when the result is not UTF-8.
fn decode_path(raw: &str) -> String {
    urlencoding::decode(raw).map_or_else(
        |e| {
            debug!(error = %e, "URL path is not valid UTF-8 after decoding, using raw path");
            raw.to_string()
        },
        std::borrow::Cow::into_owned,
    )
}

fn prefix_path(prefix: &str) -> String {
    match Url::parse(prefix) {
        Ok(parsed) if parsed.host_str().is_some() => decode_path(parsed.path()),
        _ => decode_path(prefix),
    }
}

fn escapes_root(relative: &Path) -> bool {
    relative
        .components()
        .any(|component| !matches!(component, Component::Normal(_) | Component::CurDir))
}
