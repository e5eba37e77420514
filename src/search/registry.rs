//! Source registry with concurrent fan-out and merge.
//!
//! The [`SourceRegistry`] holds a bounded set of [`SearchSource`]s and runs a
//! query against all of them at once, merging the successful results and
//! keeping a record of which sources failed.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::{FileDescriptor, SearchError, SearchSource};

/// Maximum number of sources a registry accepts.
pub const MAX_PROVIDERS: usize = 100;

/// Default cap on merged results per search.
pub const MAX_RESULTS: usize = 1024;

/// Default time budget for a single source.
pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(30);

/// A source that failed during a search, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    /// Name of the failing source.
    pub source: String,
    /// What went wrong.
    pub error: SearchError,
}

/// Merged output of [`SourceRegistry::search`].
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    results: Vec<FileDescriptor>,
    failures: Vec<SourceFailure>,
    succeeded: usize,
    truncated: usize,
}

impl SearchOutcome {
    /// Merged descriptors from every source that succeeded.
    #[must_use]
    pub fn results(&self) -> &[FileDescriptor] {
        &self.results
    }

    /// Sources that failed, in completion order.
    #[must_use]
    pub fn failures(&self) -> &[SourceFailure] {
        &self.failures
    }

    /// Number of sources that returned successfully (possibly with zero rows).
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    /// Number of descriptors dropped by the result cap.
    #[must_use]
    pub fn truncated(&self) -> usize {
        self.truncated
    }

    /// Returns true when at least one source ran and none succeeded.
    ///
    /// Lets callers tell "no matches" apart from "every indexer was down".
    #[must_use]
    pub fn all_failed(&self) -> bool {
        self.succeeded == 0 && !self.failures.is_empty()
    }

    /// Returns true when some sources failed while others succeeded.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.succeeded > 0 && !self.failures.is_empty()
    }

    /// Consumes the outcome, keeping only the merged descriptors.
    #[must_use]
    pub fn into_results(self) -> Vec<FileDescriptor> {
        self.results
    }

    fn merge(&mut self, mut batch: Vec<FileDescriptor>, cap: usize) {
        self.succeeded += 1;
        let room = cap.saturating_sub(self.results.len());
        if batch.len() > room {
            self.truncated += batch.len() - room;
            batch.truncate(room);
        }
        self.results.extend(batch);
    }

    fn record_failure(&mut self, source: &str, error: SearchError) {
        self.failures.push(SourceFailure {
            source: source.to_string(),
            error,
        });
    }
}

/// A bounded collection of search sources queried concurrently.
///
/// Sources are added during setup through `&mut self`; [`search`](Self::search)
/// only needs `&self`, so the list cannot change while a search runs.
pub struct SourceRegistry {
    sources: Vec<Arc<dyn SearchSource>>,
    max_results: usize,
    source_timeout: Option<Duration>,
}

impl SourceRegistry {
    /// Creates an empty registry with the default result cap and timeout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sources: Vec::with_capacity(MAX_PROVIDERS),
            max_results: MAX_RESULTS,
            source_timeout: Some(DEFAULT_SOURCE_TIMEOUT),
        }
    }

    /// Sets the cap on merged results; extra descriptors are dropped.
    #[must_use]
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Sets the per-source time budget; `None` waits for slow sources indefinitely.
    #[must_use]
    pub fn with_source_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.source_timeout = timeout;
        self
    }

    /// Registers a source.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::TooManyProviders`] when [`MAX_PROVIDERS`] sources
    /// are already registered.
    #[tracing::instrument(skip(self, source), fields(source_name = source.name()))]
    pub fn add_provider(&mut self, source: Arc<dyn SearchSource>) -> Result<(), SearchError> {
        if self.sources.len() >= MAX_PROVIDERS {
            return Err(SearchError::TooManyProviders { max: MAX_PROVIDERS });
        }
        debug!(name = source.name(), "Registering search source");
        self.sources.push(source);
        Ok(())
    }

    /// Returns the number of registered sources.
    #[must_use]
    pub fn provider_count(&self) -> usize {
        self.sources.len()
    }

    /// Returns true if no sources are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Queries every source concurrently and merges their results.
    ///
    /// One task is spawned per source. The call returns only after every task
    /// has finished, whether it succeeded, failed, timed out, or panicked.
    /// Results are merged in completion order, each source's own order kept.
    /// Failing sources are reported in [`SearchOutcome::failures`] and never
    /// fail the call as a whole.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::EmptyQuery`] if no keyword has visible text.
    #[tracing::instrument(skip(self), fields(sources = self.sources.len()))]
    pub async fn search(&self, keywords: &[String]) -> Result<SearchOutcome, SearchError> {
        if keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(SearchError::EmptyQuery);
        }

        let keywords: Arc<[String]> = keywords.into();
        let mut tasks = JoinSet::new();
        for (index, source) in self.sources.iter().enumerate() {
            let source = Arc::clone(source);
            let keywords = Arc::clone(&keywords);
            let timeout = self.source_timeout;
            tasks.spawn(async move {
                let result = run_source(source.as_ref(), &keywords, timeout).await;
                (index, result)
            });
        }

        let mut outcome = SearchOutcome::default();
        let mut finished = HashSet::with_capacity(self.sources.len());
        let mut aborted = Vec::new();

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => {
                    finished.insert(index);
                    let name = self.sources[index].name();
                    match result {
                        Ok(batch) => {
                            debug!(source = name, count = batch.len(), "Source returned");
                            outcome.merge(batch, self.max_results);
                        }
                        Err(error) => {
                            warn!(source = name, error = %error, "Source failed");
                            outcome.record_failure(name, error);
                        }
                    }
                }
                Err(join_error) => {
                    let reason = if join_error.is_panic() {
                        "task panicked".to_string()
                    } else {
                        join_error.to_string()
                    };
                    aborted.push(reason);
                }
            }
        }

        // A panicked task never reports its index; whatever is unaccounted for aborted.
        let mut reasons = aborted.into_iter();
        for (index, source) in self.sources.iter().enumerate() {
            if finished.contains(&index) {
                continue;
            }
            let reason = reasons
                .next()
                .unwrap_or_else(|| "task ended without a result".to_string());
            let error = SearchError::task_failed(source.name(), reason);
            warn!(source = source.name(), error = %error, "Source task aborted");
            outcome.record_failure(source.name(), error);
        }

        if outcome.truncated > 0 {
            debug!(
                dropped = outcome.truncated,
                cap = self.max_results,
                "Result cap reached"
            );
        }
        info!(
            results = outcome.results.len(),
            succeeded = outcome.succeeded,
            failed = outcome.failures.len(),
            "Search complete"
        );
        Ok(outcome)
    }
}

async fn run_source(
    source: &dyn SearchSource,
    keywords: &[String],
    timeout: Option<Duration>,
) -> Result<Vec<FileDescriptor>, SearchError> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, source.search(keywords))
            .await
            .unwrap_or_else(|_| Err(SearchError::timeout(source.name(), limit))),
        None => source.search(keywords).await,
    }
}

impl std::fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.sources.iter().map(|s| s.name()).collect();
        f.debug_struct("SourceRegistry")
            .field("provider_count", &self.sources.len())
            .field("sources", &names)
            .field("max_results", &self.max_results)
            .field("source_timeout", &self.source_timeout)
            .finish()
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
