//! Per-user persistence of the last recommendation batch.
//!
//! Each user owns one entry stored under `<prefix>_<user>`. The entry keeps
//! the batch together with the [`LibraryFingerprint`] it was computed from
//! and the time it was written, so a restarted process can still decide
//! whether the batch is current.
//!
//! Reads never fail: an unreadable store yields no entry, and an entry that
//! cannot be decoded or has outlived the configured TTL is removed and
//! treated as absent.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Clock, KeyValueStore, LibraryFingerprint, ScoredBook, StoreError, SystemClock, UserKey};

/// Default key prefix for recommendation entries.
pub const RECOMMENDATION_CACHE_PREFIX: &str = "bc_user_recommendations";

/// Errors raised while writing the cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The batch could not be encoded.
    #[error("failed to encode cached batch: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Tunables for [`RecommendationCache`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationCacheConfig {
    /// Prefix prepended to each user key.
    pub prefix: String,
    /// Maximum age of an entry; `None` keeps entries until replaced.
    pub ttl: Option<Duration>,
}

impl Default for RecommendationCacheConfig {
    fn default() -> Self {
        Self {
            prefix: RECOMMENDATION_CACHE_PREFIX.to_owned(),
            ttl: None,
        }
    }
}

impl RecommendationCacheConfig {
    /// Replace the key prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Expire entries older than `ttl`.
    #[must_use]
    pub const fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }
}

/// Stored form of a user's batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedBatch {
    /// Fingerprint of the library the batch was computed from.
    pub fingerprint: LibraryFingerprint,
    /// Write time in milliseconds since the Unix epoch.
    pub stored_at_ms: u64,
    /// Recommended books in presentation order.
    pub books: Vec<ScoredBook>,
}

/// Recommendation cache keyed by [`UserKey`].
///
/// # Examples
/// ```
/// use folio_core::{
///     BookRecord, InteractionRecord, LibraryFingerprint, MemoryStore, RecommendationCache,
///     ScoredBook, Similarity, UserKey,
/// };
///
/// let cache = RecommendationCache::new(MemoryStore::new());
/// let user = UserKey::new("reader");
/// let fingerprint = LibraryFingerprint::of(&[InteractionRecord::new("A").mark_saved()]);
/// let batch = vec![ScoredBook::new(BookRecord::new("B", "Dune"), Similarity::none())];
///
/// cache.set(&user, &fingerprint, &batch)?;
/// assert_eq!(cache.get(&user), Some(batch));
/// # Ok::<(), folio_core::CacheError>(())
/// ```
pub struct RecommendationCache<S> {
    store: S,
    config: RecommendationCacheConfig,
    clock: Arc<dyn Clock>,
}

impl<S> std::fmt::Debug for RecommendationCache<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecommendationCache")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<S: KeyValueStore> RecommendationCache<S> {
    /// Create a cache with the default prefix and no expiry.
    pub fn new(store: S) -> Self {
        Self::with_config(store, RecommendationCacheConfig::default())
    }

    /// Create a cache with explicit configuration.
    pub fn with_config(store: S, config: RecommendationCacheConfig) -> Self {
        Self {
            store,
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock used for timestamps and expiry.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Borrow the backing store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Borrow the configuration.
    pub const fn config(&self) -> &RecommendationCacheConfig {
        &self.config
    }

    /// Storage key for `user`.
    #[must_use]
    pub fn key_for(&self, user: &UserKey) -> String {
        format!("{}_{}", self.config.prefix, user)
    }

    /// Return the full stored entry for `user`, if present and current.
    pub fn entry(&self, user: &UserKey) -> Option<CachedBatch> {
        let key = self.key_for(user);
        let raw = match self.store.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!("failed to read recommendation cache {key}: {err}");
                return None;
            }
        };
        let batch: CachedBatch = match serde_json::from_str(&raw) {
            Ok(batch) => batch,
            Err(err) => {
                warn!("discarding unreadable recommendation cache {key}: {err}");
                self.discard(&key);
                return None;
            }
        };
        if self.is_expired(&batch) {
            debug!("recommendation cache {key} expired");
            self.discard(&key);
            return None;
        }
        Some(batch)
    }

    /// Return the cached batch for `user`, if present and current.
    pub fn get(&self, user: &UserKey) -> Option<Vec<ScoredBook>> {
        self.entry(user).map(|batch| batch.books)
    }

    /// Store `books` for `user`, tagged with `fingerprint`.
    ///
    /// An empty batch or the empty-library fingerprint clears the entry
    /// instead of writing it.
    ///
    /// # Errors
    /// Returns [`CacheError`] when encoding or the store write fails.
    pub fn set(
        &self,
        user: &UserKey,
        fingerprint: &LibraryFingerprint,
        books: &[ScoredBook],
    ) -> Result<(), CacheError> {
        if books.is_empty() || fingerprint.is_empty() {
            return self.clear(user).map_err(CacheError::from);
        }
        let batch = CachedBatch {
            fingerprint: fingerprint.clone(),
            stored_at_ms: self.clock.now_millis(),
            books: books.to_vec(),
        };
        let raw = serde_json::to_string(&batch)?;
        self.store.set(&self.key_for(user), &raw)?;
        debug!("cached {} recommendations for {user}", books.len());
        Ok(())
    }

    /// Remove the entry for `user`. Missing entries are not an error.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the store cannot be written.
    pub fn clear(&self, user: &UserKey) -> Result<(), StoreError> {
        self.store.remove(&self.key_for(user))
    }

    fn is_expired(&self, batch: &CachedBatch) -> bool {
        let Some(ttl) = self.config.ttl else {
            return false;
        };
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        let age_ms = self.clock.now_millis().saturating_sub(batch.stored_at_ms);
        age_ms >= ttl_ms
    }

    fn discard(&self, key: &str) {
        if let Err(err) = self.store.remove(key) {
            warn!("failed to remove recommendation cache {key}: {err}");
        }
    }
}
