//! Catalog wrapper persisting the last fetched catalog.

use std::sync::Arc;
use std::time::Duration;

use folio_core::{BookRecord, CatalogProvider, Clock, KeyValueStore, ProviderError, SystemClock};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Default store key for the cached catalog.
pub const CATALOG_CACHE_KEY: &str = "bc_recommendation_books_cache";

/// Default freshness window for the cached catalog.
pub const CATALOG_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Tunables for [`CachedCatalog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedCatalogConfig {
    /// Store key holding the catalog.
    pub key: String,
    /// Age below which the cached catalog is served without a fetch.
    pub ttl: Duration,
}

impl Default for CachedCatalogConfig {
    fn default() -> Self {
        Self {
            key: CATALOG_CACHE_KEY.to_owned(),
            ttl: CATALOG_CACHE_TTL,
        }
    }
}

impl CachedCatalogConfig {
    /// Replace the store key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Replace the freshness window.
    #[must_use]
    pub const fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CachedBooks {
    stored_at_ms: u64,
    books: Vec<BookRecord>,
}

/// Catalog provider that consults a [`KeyValueStore`] before the wrapped
/// provider.
///
/// - A cached catalog younger than the TTL is returned without calling the
///   inner provider.
/// - Otherwise the inner provider is called; a non-empty result replaces the
///   cached copy.
/// - When the inner provider fails, any cached catalog is returned, however
///   old. Without one the error is passed through.
///
/// # Examples
/// ```
/// use folio_core::{BookRecord, CatalogProvider, MemoryStore};
/// use folio_core::test_support::MemoryCatalog;
/// use folio_data::CachedCatalog;
///
/// let inner = MemoryCatalog::with_books([BookRecord::new("A", "Dune")]);
/// let catalog = CachedCatalog::new(inner, MemoryStore::new());
/// assert_eq!(catalog.books()?.len(), 1);
/// assert!(catalog.cached().is_some());
/// # Ok::<(), folio_core::ProviderError>(())
/// ```
pub struct CachedCatalog<P, K> {
    inner: P,
    store: K,
    config: CachedCatalogConfig,
    clock: Arc<dyn Clock>,
}

impl<P, K> std::fmt::Debug for CachedCatalog<P, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedCatalog")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<P: CatalogProvider, K: KeyValueStore> CachedCatalog<P, K> {
    /// Wrap `inner` with the default key and a one hour TTL.
    pub fn new(inner: P, store: K) -> Self {
        Self::with_config(inner, store, CachedCatalogConfig::default())
    }

    /// Wrap `inner` with explicit configuration.
    pub fn with_config(inner: P, store: K, config: CachedCatalogConfig) -> Self {
        Self {
            inner,
            store,
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock used for timestamps and freshness checks.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Borrow the wrapped provider.
    pub const fn inner(&self) -> &P {
        &self.inner
    }

    /// Borrow the backing store.
    pub const fn store(&self) -> &K {
        &self.store
    }

    /// Cached catalog regardless of age, if one is stored and readable.
    pub fn cached(&self) -> Option<Vec<BookRecord>> {
        self.read().map(|entry| entry.books)
    }

    /// Drop the cached catalog so the next call fetches.
    pub fn invalidate(&self) {
        if let Err(err) = self.store.remove(&self.config.key) {
            warn!("failed to remove catalog cache {}: {err}", self.config.key);
        }
    }

    fn read(&self) -> Option<CachedBooks> {
        let key = &self.config.key;
        let raw = match self.store.get(key) {
            Ok(raw) => raw?,
            Err(err) => {
                warn!("failed to read catalog cache {key}: {err}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("discarding unreadable catalog cache {key}: {err}");
                self.invalidate();
                None
            }
        }
    }

    fn write(&self, books: &[BookRecord]) {
        let entry = CachedBooks {
            stored_at_ms: self.clock.now_millis(),
            books: books.to_vec(),
        };
        let key = &self.config.key;
        let result = serde_json::to_string(&entry)
            .map_err(|err| err.to_string())
            .and_then(|raw| self.store.set(key, &raw).map_err(|err| err.to_string()));
        if let Err(message) = result {
            warn!("failed to write catalog cache {key}: {message}");
        }
    }

    fn is_fresh(&self, entry: &CachedBooks) -> bool {
        let ttl_ms = u64::try_from(self.config.ttl.as_millis()).unwrap_or(u64::MAX);
        let age_ms = self.clock.now_millis().saturating_sub(entry.stored_at_ms);
        age_ms < ttl_ms
    }
}

impl<P: CatalogProvider, K: KeyValueStore> CatalogProvider for CachedCatalog<P, K> {
    fn books(&self) -> Result<Vec<BookRecord>, ProviderError> {
        let cached = self.read();
        if let Some(entry) = cached.as_ref().filter(|entry| self.is_fresh(entry)) {
            debug!("serving {} cached catalog books", entry.books.len());
            return Ok(entry.books.clone());
        }
        match self.inner.books() {
            Ok(books) => {
                if !books.is_empty() {
                    self.write(&books);
                }
                Ok(books)
            }
            Err(err) => match cached {
                Some(entry) => {
                    warn!("catalog fetch failed, serving stale cache: {err}");
                    Ok(entry.books)
                }
                None => Err(err),
            },
        }
    }
}
