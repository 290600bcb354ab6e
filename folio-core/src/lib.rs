//! Core domain types for the Folio recommendation engine.
//!
//! The crate defines the records exchanged with external collaborators
//! (catalog books and library interactions), the traits those collaborators
//! implement, and the state the engine manages for itself: the library
//! fingerprint and the per-user recommendation cache.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod book;
pub mod cache;
pub mod clock;
pub mod fingerprint;
pub mod interaction;
pub mod provider;
pub mod recommendation;
pub mod scorer;
pub mod store;
#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;
pub mod user;

pub use book::{BookRecord, match_key};
pub use cache::{
    CacheError, CachedBatch, RECOMMENDATION_CACHE_PREFIX, RecommendationCache,
    RecommendationCacheConfig,
};
pub use clock::{Clock, SystemClock, unix_millis};
pub use fingerprint::{EMPTY_FINGERPRINT, LibraryFingerprint};
pub use interaction::{Engagement, InteractionRecord};
pub use provider::{CatalogProvider, LibraryProvider, ProviderError};
pub use recommendation::{Reason, ReasonKind, ScoredBook, Similarity};
pub use scorer::Scorer;
pub use store::{KeyValueStore, MemoryStore, StoreError, validate_key};
#[cfg(feature = "store-sqlite")]
pub use store::SqliteStore;
pub use user::{GUEST_USER_KEY, UserKey};
