//! Localhost availability check for tests that start a mock HTTP server.
//!
//! Sandboxed CI runners sometimes forbid binding sockets. Such tests then
//! skip with a note on stderr, unless `BULK_DOWNLOADER_STRICT_SOCKETS` is set
//! to a truthy value, in which case they fail.

use std::net::TcpListener;
use std::panic::Location;

use wiremock::MockServer;

const STRICT_ENV: &str = "BULK_DOWNLOADER_STRICT_SOCKETS";

fn strict_sockets() -> bool {
    std::env::var(STRICT_ENV).is_ok_and(|value| {
        let value = value.trim().to_ascii_lowercase();
        value == "1" || value == "true" || value == "yes"
    })
}

/// True when the calling test should return early because localhost
/// sockets are not available.
#[track_caller]
#[must_use]
pub fn sockets_unavailable() -> bool {
    let Err(error) = TcpListener::bind(("127.0.0.1", 0)) else {
        return false;
    };

    let caller = Location::caller();
    assert!(
        !strict_sockets(),
        "{}:{} needs a localhost socket but bind failed: {error}",
        caller.file(),
        caller.line()
    );
    eprintln!(
        "skipping {}:{}: localhost bind failed ({error}); set {STRICT_ENV}=1 to fail instead",
        caller.file(),
        caller.line()
    );
    true
}

/// Starts a mock server, or returns `None` when sockets are unavailable.
pub async fn start_mock_server_or_skip() -> Option<MockServer> {
    if sockets_unavailable() {
        return None;
    }
    Some(MockServer::start().await)
}
