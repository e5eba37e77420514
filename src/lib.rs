//! XDCC Search Core Library
//!
//! This library finds packs advertised by XDCC bots on IRC by querying one
//! or more web indexers concurrently and normalizing their listings into
//! [`FileDescriptor`] records that say how to request each file.
//!
//! # Architecture
//!
//! - [`search`] - Search sources, the concurrent source registry, and the
//!   xdcc.eu result table scraper
//!
//! Connecting to IRC and transferring files is left to downstream clients;
//! this crate stops at the `/msg <bot> xdcc send <pack>` command.

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod search;
mod user_agent;

// Re-export commonly used types
pub use search::{
    FileDescriptor, MAX_PROVIDERS, MAX_RESULTS, SearchError, SearchOutcome, SearchSettings,
    SearchSource, SizeParseError, SourceFailure, SourceRegistry, UNKNOWN_SIZE, XdccEuProvider,
    build_default_registry, configure_search_http_timeouts, parse_file_size,
};
