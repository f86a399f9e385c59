//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use bulk_downloader_core::DEFAULT_MAX_TRIES;

/// Fetch every URL in a list to local files.
///
/// Failed attempts are retried with waits derived from rate-limit headers or
/// exponential backoff. Files already on disk are skipped, so a batch can be
/// re-run until it completes.
#[derive(Parser, Debug)]
#[command(name = "bulk-downloader")]
#[command(author, version, about)]
pub struct Args {
    /// File with one URL per line (blank lines and `#` comments ignored)
    #[arg(short = 'u', long, value_parser = existing_file)]
    pub url_file: PathBuf,

    /// Directory downloaded files are written under [default: <temp dir>/data]
    #[arg(short = 'd', long)]
    pub download_dir: Option<PathBuf>,

    /// Prefix to strip from each URL path before mapping it to a file (repeatable)
    #[arg(short = 'p', long = "prefixes-to-remove", value_name = "PREFIX")]
    pub prefixes_to_remove: Vec<String>,

    /// Also strip the longest directory prefix shared by all URL paths
    #[arg(short = 'a', long)]
    pub auto_remove_prefix: bool,

    /// Process URLs in random order
    #[arg(short = 'r', long)]
    pub randomize: bool,

    /// Log level filter (overridden by RUST_LOG)
    #[arg(short = 'l', long, default_value = "info")]
    pub log_level: String,

    /// Attempts per URL, including the first
    #[arg(short = 'm', long, default_value_t = DEFAULT_MAX_TRIES, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_tries: u32,

    /// Extra pause in seconds after each freshly downloaded file
    #[arg(long, default_value_t = 0)]
    pub pause_secs: u64,

    /// Connect timeout in seconds
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub connect_timeout_secs: u64,

    /// Whole-request timeout in seconds, including the body
    #[arg(long, default_value_t = 300, value_parser = clap::value_parser!(u64).range(1..))]
    pub read_timeout_secs: u64,

    /// Print the final summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl Args {
    /// Download directory, falling back to `<temp dir>/data`.
    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("data"))
    }
}

fn existing_file(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if path.is_file() {
        Ok(path)
    } else {
        Err(format!("URL file not found: {value}"))
    }
}
