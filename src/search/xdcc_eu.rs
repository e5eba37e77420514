//! xdcc.eu source: scrapes the HTML search result table into descriptors.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, trace};
use url::Url;

use super::http_client::{build_search_http_client, configured_read_timeout};
use super::{FileDescriptor, SearchError, SearchSource, UNKNOWN_SIZE, parse_file_size};

/// Default xdcc.eu search endpoint.
pub const DEFAULT_XDCC_EU_URL: &str = "https://www.xdcc.eu/search.php";

const SOURCE_NAME: &str = "xdcc.eu";

/// Cells per result row: network, channel, bot, pack, gets, size, file name.
const CELLS_PER_ROW: usize = 7;

/// Column holding the `irc://` channel link.
const LOCATOR_CELL: usize = 1;

/// Search source backed by the xdcc.eu result page.
pub struct XdccEuProvider {
    client: Client,
    base_url: Url,
    read_timeout: Duration,
}

impl XdccEuProvider {
    /// Creates a provider for the public xdcc.eu endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] when HTTP client construction fails.
    pub fn new() -> Result<Self, SearchError> {
        Self::with_base_url(DEFAULT_XDCC_EU_URL)
    }

    /// Creates a provider for a custom endpoint (mirrors, tests).
    ///
    /// # Errors
    ///
    /// Any `#fragment` on `base_url` is dropped; it is never sent to the
    /// server and would swallow the appended query.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidEndpoint`] when `base_url` is not an
    /// absolute `http`/`https` URL, or [`SearchError::ClientBuild`] when the
    /// HTTP client cannot be built.
    pub fn with_base_url(base_url: &str) -> Result<Self, SearchError> {
        let mut parsed =
            Url::parse(base_url).map_err(|error| SearchError::invalid_endpoint(base_url, error))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SearchError::invalid_endpoint(
                base_url,
                format!("unsupported scheme '{}'", parsed.scheme()),
            ));
        }
        parsed.set_fragment(None);

        Ok(Self {
            client: build_search_http_client(SOURCE_NAME)?,
            base_url: parsed,
            read_timeout: configured_read_timeout(),
        })
    }

    fn search_url(&self, search_key: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut().append_pair("searchkey", search_key);
        url
    }

    fn request_error(&self, url: &Url, error: &reqwest::Error) -> SearchError {
        if error.is_timeout() {
            SearchError::timeout(SOURCE_NAME, self.read_timeout)
        } else {
            SearchError::network(SOURCE_NAME, url.as_str(), error)
        }
    }
}

impl std::fmt::Debug for XdccEuProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XdccEuProvider")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SearchSource for XdccEuProvider {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    #[tracing::instrument(skip(self), fields(source = SOURCE_NAME))]
    async fn search(&self, keywords: &[String]) -> Result<Vec<FileDescriptor>, SearchError> {
        let search_key = build_search_key(keywords);
        if search_key.is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        let url = self.search_url(&search_key);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|error| self.request_error(&url, &error))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(SearchError::http_status(SOURCE_NAME, url.as_str(), status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|error| self.request_error(&url, &error))?;

        let files = parse_result_table(&body)?;
        debug!(count = files.len(), "Parsed xdcc.eu result table");
        Ok(files)
    }
}

/// Builds the raw `searchkey` value: terms split on whitespace and re-joined
/// with single spaces.
///
/// Encoding happens when the value is appended to the request URL, where
/// spaces become `+` and reserved characters are percent-escaped.
#[must_use]
pub fn build_search_key(keywords: &[String]) -> String {
    keywords
        .iter()
        .flat_map(|keyword| keyword.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extracts descriptors from an xdcc.eu result page.
///
/// The first `tr` is the header and is skipped. Rows without exactly seven
/// cells, or with a blank bot, pack or file name, are dropped. Undecodable
/// gets and sizes fall back to `0` and [`UNKNOWN_SIZE`].
///
/// # Errors
///
/// Returns [`SearchError::Parse`] if the row selectors cannot be compiled.
pub fn parse_result_table(html: &str) -> Result<Vec<FileDescriptor>, SearchError> {
    let row_selector = compile_selector("tr")?;
    let anchor_selector = compile_selector("a")?;
    let document = Html::parse_document(html);

    let mut files = Vec::new();
    for (index, row) in document.select(&row_selector).enumerate().skip(1) {
        let cells: Vec<ElementRef<'_>> = row.children().filter_map(ElementRef::wrap).collect();
        let texts: Vec<String> = cells
            .iter()
            .map(|cell| cell.text().collect::<String>().trim().to_string())
            .collect();
        let locator = cells
            .get(LOCATOR_CELL)
            .and_then(|cell| cell.select(&anchor_selector).next())
            .and_then(|anchor| anchor.value().attr("href"))
            .unwrap_or_default();

        match descriptor_from_cells(&texts, locator) {
            Some(file) => files.push(file),
            None => trace!(
                row = index,
                cells = texts.len(),
                expected = CELLS_PER_ROW,
                "Skipping malformed result row"
            ),
        }
    }
    Ok(files)
}

fn compile_selector(css: &str) -> Result<Selector, SearchError> {
    Selector::parse(css)
        .map_err(|error| SearchError::parse(SOURCE_NAME, format!("selector '{css}': {error:?}")))
}

fn descriptor_from_cells(cells: &[String], locator: &str) -> Option<FileDescriptor> {
    let [network, channel, bot_name, slot, gets, size, file_name] = cells else {
        return None;
    };
    if bot_name.is_empty() || slot.is_empty() || file_name.is_empty() {
        return None;
    }

    Some(FileDescriptor::new(
        network.as_str(),
        channel.as_str(),
        bot_name.as_str(),
        file_name.as_str(),
        parse_get_count(gets),
        slot.as_str(),
        parse_file_size(size).unwrap_or(UNKNOWN_SIZE),
        locator.replacen("irc://", "http://", 1),
    ))
}

/// Parses a gets cell such as `123x`: the trailing marker is dropped.
fn parse_get_count(text: &str) -> u64 {
    let mut chars = text.chars();
    chars.next_back();
    chars.as_str().parse().unwrap_or(0)
}
