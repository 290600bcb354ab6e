//! HTTP client for the Open Library search endpoint.
//!
//! The [`CatalogProvider`] trait is synchronous. This provider bridges the
//! async `reqwest` call by blocking on a Tokio runtime it owns, or on the
//! caller's multi-threaded runtime when one is running.

use std::time::Duration;

use folio_core::{BookRecord, CatalogProvider, ProviderError};
use log::debug;
use reqwest::Client;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;

use super::search::{SearchDoc, SearchResponse};

/// Public Open Library endpoint.
pub const DEFAULT_BASE_URL: &str = "https://openlibrary.org";

/// Broad query mixing fiction and non-fiction subjects.
pub const DEFAULT_QUERY: &str =
    "subject:fiction OR subject:nonfiction OR subject:science OR subject:history";

/// Number of books requested for a recommendation catalog.
pub const DEFAULT_LIMIT: usize = 100;

/// Default user agent for search requests.
pub const DEFAULT_USER_AGENT: &str = "folio-catalog/0.1";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const SEARCH_FIELDS: &str =
    "title,author_name,first_publish_year,isbn,cover_i,subject,key,edition_key";

/// Errors raised while constructing an [`OpenLibraryCatalog`].
#[derive(Debug, Error)]
pub enum OpenLibraryError {
    /// The base URL could not be parsed.
    #[error("invalid Open Library URL {url}: {source}")]
    InvalidUrl {
        /// Offending URL.
        url: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// The Tokio runtime could not be built.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Configuration for [`OpenLibraryCatalog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenLibraryConfig {
    /// Service root, e.g. `https://openlibrary.org`.
    pub base_url: String,
    /// Search expression sent as `q`.
    pub query: String,
    /// Maximum number of books returned.
    pub limit: usize,
    /// Connect and request timeout.
    pub timeout: Duration,
    /// User agent header.
    pub user_agent: String,
}

impl Default for OpenLibraryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            query: DEFAULT_QUERY.to_owned(),
            limit: DEFAULT_LIMIT,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl OpenLibraryConfig {
    /// Configuration targeting `base_url` with default search settings.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Replace the search expression.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Cap the number of returned books.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the `search.json` URL for this configuration.
    ///
    /// # Errors
    /// Returns [`OpenLibraryError::InvalidUrl`] when `base_url` is not a
    /// valid absolute URL.
    pub fn search_url(&self) -> Result<Url, OpenLibraryError> {
        let raw = format!("{}/search.json", self.base_url.trim_end_matches('/'));
        let mut url = Url::parse(&raw).map_err(|source| OpenLibraryError::InvalidUrl {
            url: self.base_url.clone(),
            source,
        })?;
        url.query_pairs_mut()
            .append_pair("q", &self.query)
            .append_pair("limit", &self.limit.to_string())
            .append_pair("fields", SEARCH_FIELDS);
        Ok(url)
    }
}

/// Catalog fetched from Open Library on every call.
///
/// Wrap it in [`CachedCatalog`](crate::CachedCatalog) to avoid a request per
/// recommendation refresh.
///
/// # Runtime behaviour
///
/// Outside any Tokio runtime the provider blocks on its own current-thread
/// runtime. Inside a multi-threaded runtime it uses
/// [`tokio::task::block_in_place`] on the caller's handle. Inside a
/// current-thread runtime it falls back to its own runtime, which may stall
/// the caller's runtime for the duration of the request.
pub struct OpenLibraryCatalog {
    client: Client,
    config: OpenLibraryConfig,
    search_url: Url,
    runtime: Runtime,
}

impl std::fmt::Debug for OpenLibraryCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenLibraryCatalog")
            .field("config", &self.config)
            .field("search_url", &self.search_url.as_str())
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish_non_exhaustive()
    }
}

impl OpenLibraryCatalog {
    /// Create a provider for `base_url` with default search settings.
    ///
    /// # Errors
    /// Returns [`OpenLibraryError`] when the URL is invalid or the HTTP
    /// client or runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, OpenLibraryError> {
        Self::with_config(OpenLibraryConfig::new(base_url))
    }

    /// Create a provider with explicit configuration.
    ///
    /// # Errors
    /// Returns [`OpenLibraryError`] when the URL is invalid or the HTTP
    /// client or runtime fails to build.
    pub fn with_config(config: OpenLibraryConfig) -> Result<Self, OpenLibraryError> {
        let search_url = config.search_url()?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(OpenLibraryError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(OpenLibraryError::Runtime)?;
        Ok(Self {
            client,
            config,
            search_url,
            runtime,
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &OpenLibraryConfig {
        &self.config
    }

    /// URL requested by [`CatalogProvider::books`].
    #[must_use]
    pub const fn search_url(&self) -> &Url {
        &self.search_url
    }

    async fn fetch(&self) -> Result<SearchResponse, ProviderError> {
        let url = self.search_url.as_str();
        let response = self
            .client
            .get(self.search_url.clone())
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, url))?;
        response
            .json::<SearchResponse>()
            .await
            .map_err(|err| ProviderError::Parse {
                origin: url.to_owned(),
                message: err.to_string(),
            })
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> ProviderError {
        if error.is_timeout() {
            return ProviderError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }
        if let Some(status) = error.status() {
            return ProviderError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }
        ProviderError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }

    fn convert_response(&self, response: SearchResponse) -> Vec<BookRecord> {
        let total = response.docs.len();
        let books: Vec<BookRecord> = response
            .docs
            .into_iter()
            .filter_map(SearchDoc::into_book)
            .take(self.config.limit)
            .collect();
        debug!(
            "mapped {} of {total} Open Library docs to books",
            books.len()
        );
        books
    }
}

impl CatalogProvider for OpenLibraryCatalog {
    fn books(&self) -> Result<Vec<BookRecord>, ProviderError> {
        let future = self.fetch();
        let response = match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }?;
        Ok(self.convert_response(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn search_url_encodes_query_and_fields() {
        let config = OpenLibraryConfig::new("http://books.example.com/")
            .with_query("subject:fantasy")
            .with_limit(5);
        let url = config.search_url().expect("valid url");
        assert_eq!(url.path(), "/search.json");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("q".to_owned(), "subject:fantasy".to_owned()),
                ("limit".to_owned(), "5".to_owned()),
                ("fields".to_owned(), SEARCH_FIELDS.to_owned()),
            ]
        );
    }

    #[rstest]
    fn invalid_base_url_is_rejected() {
        let err = OpenLibraryCatalog::new("not a url").expect_err("invalid url");
        assert!(matches!(err, OpenLibraryError::InvalidUrl { .. }));
    }

    #[rstest]
    fn convert_response_skips_unusable_docs_and_applies_limit() {
        let provider = OpenLibraryCatalog::with_config(
            OpenLibraryConfig::new("http://localhost:1").with_limit(2),
        )
        .expect("provider should build");
        let response: SearchResponse = serde_json::from_str(
            r#"{"docs":[
                {"title":"One","author_name":["A"],"isbn":["1111111111"]},
                {"author_name":["No Title"]},
                {"title":"Two","author_name":["B"],"key":"/works/OL2W"},
                {"title":"Three","author_name":["C"],"key":"/works/OL3W"}
            ]}"#,
        )
        .expect("valid response");
        let books = provider.convert_response(response);
        let titles: Vec<&str> = books.iter().map(|book| book.title.as_str()).collect();
        assert_eq!(titles, ["One", "Two"]);
    }

    #[rstest]
    fn config_builder_pattern() {
        let config = OpenLibraryConfig::default()
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("test-agent/1.0");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.limit, DEFAULT_LIMIT);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "test-agent/1.0");
    }
}
