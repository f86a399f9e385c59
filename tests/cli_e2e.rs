//! End-to-end CLI tests for the bulk-downloader binary.

// `Command::cargo_bin` is deprecated in assert_cmd >=2.0.17 in favor of
// `cargo::cargo_bin_cmd!` macro. Suppressed until migration to the new API.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod support;
use support::socket_guard::sockets_unavailable;

fn write_url_file(dir: &std::path::Path, contents: &str) -> std::path::PathBuf {
    let file = dir.join("urls.txt");
    std::fs::write(&file, contents).unwrap();
    file
}

fn start_mock_server() -> MockServer {
    tokio_test::block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bulk/2024/a.csv"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"a".to_vec()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/bulk/2024/b.csv"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"bb".to_vec()))
            .mount(&server)
            .await;
        server
    })
}

#[test]
fn test_binary_help_displays_usage() {
    let mut cmd = Command::cargo_bin("bulk-downloader").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--url-file"))
        .stdout(predicate::str::contains("--prefixes-to-remove"));
}

#[test]
fn test_binary_version_displays_version() {
    let mut cmd = Command::cargo_bin("bulk-downloader").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bulk-downloader"));
}

#[test]
fn test_binary_without_url_file_fails() {
    let mut cmd = Command::cargo_bin("bulk-downloader").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--url-file"));
}

#[test]
fn test_binary_missing_url_file_fails() {
    let mut cmd = Command::cargo_bin("bulk-downloader").unwrap();
    cmd.args(["--url-file", "/definitely/not/here/urls.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("URL file not found"));
}

#[test]
fn test_binary_empty_url_file_reports_zero_counts() {
    let temp_dir = TempDir::new().unwrap();
    let url_file = write_url_file(temp_dir.path(), "# nothing yet\n\n");

    let mut cmd = Command::cargo_bin("bulk-downloader").unwrap();
    cmd.arg("--url-file")
        .arg(&url_file)
        .arg("--download-dir")
        .arg(temp_dir.path().join("out"))
        .assert()
        .success()
        .stdout(predicate::str::contains("existing: 0, succeeded: 0, failed: 0"));
}

#[test]
fn test_binary_downloads_with_auto_prefix_and_json_summary() {
    if sockets_unavailable() {
        return;
    }
    let server = start_mock_server();

    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("out");
    let url_file = write_url_file(
        temp_dir.path(),
        &format!(
            "{0}/bulk/2024/a.csv\n# skipped comment\n\n{0}/bulk/2024/b.csv\n",
            server.uri()
        ),
    );

    let mut cmd = Command::cargo_bin("bulk-downloader").unwrap();
    let output = cmd
        .arg("--url-file")
        .arg(&url_file)
        .arg("--download-dir")
        .arg(&out_dir)
        .arg("--auto-remove-prefix")
        .arg("--json")
        .env_remove("RUST_LOG")
        .output()
        .unwrap();

    assert!(output.status.success());
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["success_count"], 2);
    assert_eq!(summary["failure_count"], 0);
    assert_eq!(std::fs::read(out_dir.join("a.csv")).unwrap(), b"a");
    assert_eq!(std::fs::read(out_dir.join("b.csv")).unwrap(), b"bb");
}

#[test]
fn test_binary_rerun_reports_existing_files() {
    if sockets_unavailable() {
        return;
    }
    let server = start_mock_server();

    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("out");
    let url_file = write_url_file(
        temp_dir.path(),
        &format!("{0}/bulk/2024/a.csv\n{0}/bulk/2024/b.csv\n", server.uri()),
    );

    for expected in [
        "existing: 0, succeeded: 2, failed: 0",
        "existing: 2, succeeded: 0, failed: 0",
    ] {
        let mut cmd = Command::cargo_bin("bulk-downloader").unwrap();
        cmd.arg("--url-file")
            .arg(&url_file)
            .arg("--download-dir")
            .arg(&out_dir)
            .args(["--prefixes-to-remove", "/bulk/"])
            .assert()
            .success()
            .stdout(predicate::str::contains(expected));
    }
    assert!(out_dir.join("2024/a.csv").is_file());
}
