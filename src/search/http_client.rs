//! Shared HTTP client construction policy for search sources.
//!
//! Keeps every source consistent on timeouts, user-agent and compression.

use std::sync::RwLock;
use std::time::Duration;

use reqwest::Client;

use crate::user_agent;

use super::SearchError;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const READ_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SearchHttpTimeouts {
    connect_timeout_secs: u64,
    read_timeout_secs: u64,
}

impl Default for SearchHttpTimeouts {
    fn default() -> Self {
        Self {
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            read_timeout_secs: READ_TIMEOUT_SECS,
        }
    }
}

static SEARCH_HTTP_TIMEOUTS: RwLock<SearchHttpTimeouts> = RwLock::new(SearchHttpTimeouts {
    connect_timeout_secs: CONNECT_TIMEOUT_SECS,
    read_timeout_secs: READ_TIMEOUT_SECS,
});

/// Configures HTTP timeouts used by search source client builders.
///
/// Intended for CLI/runtime configuration before sources are constructed;
/// clients built earlier keep their old values.
pub fn configure_search_http_timeouts(connect_timeout_secs: u64, read_timeout_secs: u64) {
    if let Ok(mut guard) = SEARCH_HTTP_TIMEOUTS.write() {
        *guard = SearchHttpTimeouts {
            connect_timeout_secs,
            read_timeout_secs,
        };
    }
}

fn search_http_timeouts() -> SearchHttpTimeouts {
    SEARCH_HTTP_TIMEOUTS
        .read()
        .map(|guard| *guard)
        .unwrap_or_default()
}

/// Read timeout that newly built clients will use.
pub(crate) fn configured_read_timeout() -> Duration {
    Duration::from_secs(search_http_timeouts().read_timeout_secs)
}

/// Builds a source HTTP client using shared project policy.
///
/// `source_name` is used only for error messages.
///
/// # Errors
///
/// Returns [`SearchError::ClientBuild`] when client construction fails
/// (for example when the TLS backend cannot initialize).
pub(crate) fn build_search_http_client(source_name: &str) -> Result<Client, SearchError> {
    let timeouts = search_http_timeouts();
    Client::builder()
        .connect_timeout(Duration::from_secs(timeouts.connect_timeout_secs))
        .timeout(Duration::from_secs(timeouts.read_timeout_secs))
        .user_agent(user_agent::default_search_user_agent())
        .gzip(true)
        .build()
        .map_err(|error| SearchError::client_build(source_name, error))
}
