//! Shared User-Agent string for indexer HTTP clients.
//!
//! Single source for project URL and UA format so every search source
//! identifies itself the same way.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/xdcc-search";

/// Default User-Agent for search requests (no per-source name in header).
#[must_use]
pub(crate) fn default_search_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("xdcc-search/{version} (+{PROJECT_UA_URL})")
}
