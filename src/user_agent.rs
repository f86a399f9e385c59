//! User-Agent string sent with every download request.

/// Project URL for User-Agent identification (good citizenship; RFC 9308).
const PROJECT_UA_URL: &str = "https://github.com/fierce/bulk-downloader";

/// Default User-Agent for download requests (identifies the tool and version).
#[must_use]
pub(crate) fn default_download_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("bulk-downloader/{version} (+{PROJECT_UA_URL})")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_carries_crate_version() {
        let ua = default_download_user_agent();
        assert_eq!(
            env!("CARGO_PKG_VERSION"),
            ua.strip_prefix("bulk-downloader/")
                .and_then(|s| s.split(' ').next())
                .unwrap(),
            "UA must contain crate version: {ua}"
        );
    }

    #[test]
    fn test_user_agent_carries_project_url() {
        assert!(default_download_user_agent().contains(PROJECT_UA_URL));
    }
}
