//! Error types for search operations.
//!
//! This module defines structured errors for source queries and size decoding,
//! following the What/Why/Fix pattern used across the project.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while querying search sources.
///
/// Cloneable so the registry can hand the same error to logging and to the
/// caller's failure list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The keyword list contained no usable term
    #[error("empty search query\n  Suggestion: Provide at least one non-blank keyword")]
    EmptyQuery,

    /// The registry already holds the maximum number of sources
    #[error(
        "cannot register more than {max} search sources\n  Suggestion: Remove unused sources before adding new ones"
    )]
    TooManyProviders {
        /// Registry capacity
        max: usize,
    },

    /// A source endpoint is not a valid absolute URL
    #[error("invalid search endpoint '{url}': {reason}\n  Suggestion: Use an absolute http(s) URL")]
    InvalidEndpoint {
        /// The rejected endpoint
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// The HTTP client for a source could not be built
    #[error(
        "could not build HTTP client for {source_name}: {reason}\n  Suggestion: Check the TLS setup of this system"
    )]
    ClientBuild {
        /// Name of the source whose client failed
        source_name: String,
        /// Builder error text
        reason: String,
    },

    /// The request could not be completed (DNS, connect, TLS, body read)
    #[error(
        "network error querying {source_name} at {url}: {reason}\n  Suggestion: Check connectivity or try again later"
    )]
    Network {
        /// Name of the failing source
        source_name: String,
        /// Requested URL
        url: String,
        /// Underlying transport error text
        reason: String,
    },

    /// The source did not answer within the allowed time
    #[error(
        "{source_name} timed out after {limit:?}\n  Suggestion: Raise source_timeout_secs or retry later"
    )]
    Timeout {
        /// Name of the failing source
        source_name: String,
        /// Time budget that ran out
        limit: Duration,
    },

    /// The source answered with a non-200 status
    #[error(
        "HTTP {status} from {source_name} at {url}\n  Suggestion: The indexer may be down or has changed its API"
    )]
    HttpStatus {
        /// Name of the failing source
        source_name: String,
        /// Requested URL
        url: String,
        /// Response status code
        status: u16,
    },

    /// The response body could not be interpreted
    #[error(
        "could not parse response from {source_name}: {reason}\n  Suggestion: The indexer page layout may have changed"
    )]
    Parse {
        /// Name of the failing source
        source_name: String,
        /// Why parsing failed
        reason: String,
    },

    /// The task driving a source panicked or was cancelled
    #[error("search task for {source_name} aborted: {reason}")]
    TaskFailed {
        /// Name of the failing source
        source_name: String,
        /// Panic or cancellation detail
        reason: String,
    },
}

impl SearchError {
    /// Creates a `Network` error from a transport failure.
    #[must_use]
    pub fn network(source_name: &str, url: &str, reason: impl std::fmt::Display) -> Self {
        Self::Network {
            source_name: source_name.to_string(),
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates a `Timeout` error.
    #[must_use]
    pub fn timeout(source_name: &str, limit: Duration) -> Self {
        Self::Timeout {
            source_name: source_name.to_string(),
            limit,
        }
    }

    /// Creates a `ClientBuild` error.
    #[must_use]
    pub fn client_build(source_name: &str, reason: impl std::fmt::Display) -> Self {
        Self::ClientBuild {
            source_name: source_name.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates an `HttpStatus` error.
    #[must_use]
    pub fn http_status(source_name: &str, url: &str, status: u16) -> Self {
        Self::HttpStatus {
            source_name: source_name.to_string(),
            url: url.to_string(),
            status,
        }
    }

    /// Creates a `Parse` error.
    #[must_use]
    pub fn parse(source_name: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            source_name: source_name.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates an `InvalidEndpoint` error.
    #[must_use]
    pub fn invalid_endpoint(url: &str, reason: impl std::fmt::Display) -> Self {
        Self::InvalidEndpoint {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates a `TaskFailed` error.
    #[must_use]
    pub fn task_failed(source_name: &str, reason: impl Into<String>) -> Self {
        Self::TaskFailed {
            source_name: source_name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors from decoding a human-readable size such as `2.50G`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SizeParseError {
    /// Nothing to decode
    #[error("empty size string")]
    Empty,

    /// The numeric prefix is not a usable number
    #[error("invalid size number '{value}'")]
    InvalidNumber {
        /// The full size text
        value: String,
    },

    /// The trailing unit is not one of `K`, `M`, `G`
    #[error("unrecognized size unit '{unit}'")]
    UnknownUnit {
        /// The offending unit character
        unit: char,
    },
}
