//! CLI entry point for the bulk downloader.

use std::io::{self, IsTerminal};
use std::time::Duration;

use anyhow::{Context, Result};
use bulk_downloader_core::download::path::url_paths;
use bulk_downloader_core::{
    ClientConfig, DownloadEngine, EngineConfig, HttpClient, RunStats, longest_common_prefix,
    read_url_file, shuffle_urls,
};
use clap::Parser;
use tracing::{debug, info};

mod cli;
mod progress;

use cli::Args;
use progress::ProgressSleeper;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > --log-level
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&args.log_level))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let mut urls = read_url_file(&args.url_file)?;
    info!(url_count = urls.len(), file = %args.url_file.display(), "loaded URL list");

    if args.randomize {
        shuffle_urls(&mut urls);
        debug!("URL order randomized");
    }

    let mut prefixes = args.prefixes_to_remove.clone();
    if args.auto_remove_prefix {
        let common = longest_common_prefix(&url_paths(&urls));
        if common.is_empty() || common == "/" {
            info!("no common URL path prefix to remove");
        } else {
            info!(prefix = %common, "removing common URL path prefix");
            prefixes.push(common);
        }
    }

    let download_dir = args.download_dir();
    info!(download_dir = %download_dir.display(), "writing files");

    let client = HttpClient::new(&ClientConfig {
        connect_timeout_secs: args.connect_timeout_secs,
        read_timeout_secs: args.read_timeout_secs,
        ..ClientConfig::default()
    })
    .context("cannot start HTTP client")?;

    let config = EngineConfig::new(download_dir)
        .with_prefixes(prefixes)
        .with_max_tries(args.max_tries)
        .with_pause_after_download(Duration::from_secs(args.pause_secs));
    let engine = DownloadEngine::new(config)
        .with_sleeper(ProgressSleeper::new(io::stderr().is_terminal()));

    let stats = engine.run(&client, &urls).await;
    print_summary(&stats, args.json)?;

    Ok(())
}

fn print_summary(stats: &RunStats, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(stats)?);
    } else {
        println!(
            "existing: {}, succeeded: {}, failed: {}, invalid: {}, abandoned: {}",
            stats.existing_count,
            stats.success_count,
            stats.failure_count,
            stats.invalid_count,
            stats.abandoned_count
        );
    }
    Ok(())
}
