//! Multi-source XDCC search: sources, aggregation, and result descriptors.
//!
//! This module fans a keyword query out to every registered indexer and
//! merges what comes back into provider-agnostic [`FileDescriptor`] records.
//!
//! # Architecture
//!
//! - [`SearchSource`] - Async trait that individual indexers implement
//! - [`SourceRegistry`] - Bounded collection of sources with concurrent fan-out
//! - [`SearchOutcome`] - Merged results plus per-source failures
//! - [`XdccEuProvider`] - Scrapes the xdcc.eu HTML result table
//! - [`parse_file_size`] - Decodes `750M`-style size notation
//!
//! # Example
//!
//! ```no_run
//! use xdcc_search_core::search::{SearchSettings, build_default_registry};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = build_default_registry(&SearchSettings::default());
//! let outcome = registry.search(&["ubuntu".to_string(), "iso".to_string()]).await?;
//! for file in outcome.results() {
//!     println!("{} -> {}", file.file_name(), file.command());
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod http_client;
mod registry;
mod size;
mod xdcc_eu;

pub use error::{SearchError, SizeParseError};
pub use http_client::configure_search_http_timeouts;
pub use registry::{
    DEFAULT_SOURCE_TIMEOUT, MAX_PROVIDERS, MAX_RESULTS, SearchOutcome, SourceFailure,
    SourceRegistry,
};
pub use size::{GIBIBYTE, KIBIBYTE, MEBIBYTE, parse_file_size};
pub use xdcc_eu::{DEFAULT_XDCC_EU_URL, XdccEuProvider, build_search_key, parse_result_table};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;

/// Size value recorded when an indexer's size text cannot be decoded.
pub const UNKNOWN_SIZE: i64 = -1;

/// One downloadable pack as advertised by an indexer.
///
/// Descriptors are plain values: once built they are never mutated and hold
/// no reference back to the source that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDescriptor {
    network: String,
    channel: String,
    bot_name: String,
    file_name: String,
    get_count: u64,
    slot: String,
    size_bytes: i64,
    url: String,
    command: String,
}

impl FileDescriptor {
    /// Creates a descriptor, deriving the `/msg` command from bot and slot.
    ///
    /// `url` is stored as given; callers are expected to have rewritten the
    /// indexer's `irc://` locator already.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        network: impl Into<String>,
        channel: impl Into<String>,
        bot_name: impl Into<String>,
        file_name: impl Into<String>,
        get_count: u64,
        slot: impl Into<String>,
        size_bytes: i64,
        url: impl Into<String>,
    ) -> Self {
        let bot_name = bot_name.into();
        let slot = slot.into();
        let command = xdcc_send_command(&bot_name, &slot);
        Self {
            network: network.into(),
            channel: channel.into(),
            bot_name,
            file_name: file_name.into(),
            get_count,
            slot,
            size_bytes,
            url: url.into(),
            command,
        }
    }

    /// IRC network hosting the bot.
    #[must_use]
    pub fn network(&self) -> &str {
        &self.network
    }

    /// Channel the bot sits in.
    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Nickname of the serving bot.
    #[must_use]
    pub fn bot_name(&self) -> &str {
        &self.bot_name
    }

    /// Advertised file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Number of times the pack has been fetched, 0 when unknown.
    #[must_use]
    pub fn get_count(&self) -> u64 {
        self.get_count
    }

    /// Pack number to request.
    #[must_use]
    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Size in bytes, or [`UNKNOWN_SIZE`].
    #[must_use]
    pub fn size_bytes(&self) -> i64 {
        self.size_bytes
    }

    /// Returns true when the indexer's size text could not be decoded.
    #[must_use]
    pub fn size_is_unknown(&self) -> bool {
        self.size_bytes == UNKNOWN_SIZE
    }

    /// Bot locator with an `http://` scheme.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Chat command that asks the bot to send this pack.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }
}

/// Builds the `/msg <bot> xdcc send <slot>` command text.
#[must_use]
pub fn xdcc_send_command(bot_name: &str, slot: &str) -> String {
    format!("/msg {bot_name} xdcc send {slot}")
}

/// Trait that all search sources must implement.
///
/// A source turns keyword terms into descriptors. Failures are returned as
/// [`SearchError`]; a source must never panic or exit the process on a
/// recoverable error, since siblings are still running.
///
/// # Object Safety
///
/// This trait uses `async_trait` to support dynamic dispatch via
/// `Arc<dyn SearchSource>`.
#[async_trait]
pub trait SearchSource: Send + Sync {
    /// Returns the source's name (e.g., "xdcc.eu"), used in logs and failures.
    fn name(&self) -> &str;

    /// Runs one query against the source.
    async fn search(&self, keywords: &[String]) -> Result<Vec<FileDescriptor>, SearchError>;
}

/// Knobs for building the default registry.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    /// Endpoint of the xdcc.eu search page.
    pub xdcc_eu_url: String,
    /// Cap on merged results.
    pub max_results: usize,
    /// Per-source time budget; `None` waits indefinitely.
    pub source_timeout: Option<Duration>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            xdcc_eu_url: DEFAULT_XDCC_EU_URL.to_string(),
            max_results: MAX_RESULTS,
            source_timeout: Some(DEFAULT_SOURCE_TIMEOUT),
        }
    }
}

/// Builds the registry used by CLI execution flows.
///
/// Sources that cannot be constructed are logged and skipped so the rest
/// of the registry stays usable.
#[must_use]
pub fn build_default_registry(settings: &SearchSettings) -> SourceRegistry {
    let mut registry = SourceRegistry::new()
        .with_max_results(settings.max_results)
        .with_source_timeout(settings.source_timeout);

    match XdccEuProvider::with_base_url(&settings.xdcc_eu_url) {
        Ok(provider) => {
            if let Err(error) = registry.add_provider(Arc::new(provider)) {
                warn!(error = %error, "xdcc.eu source not registered");
            }
        }
        Err(error) => warn!(
            error = %error,
            "xdcc.eu source unavailable; continuing with remaining sources"
        ),
    }

    registry
}
