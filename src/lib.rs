//! Facade crate for the Folio recommendation engine.
//!
//! This crate re-exports the core domain types, the similarity scorer and
//! the recommendation engine, and exposes optional catalog sources and
//! store implementations behind feature flags.

#![forbid(unsafe_code)]

pub use folio_core::{
    BookRecord, CachedBatch, CatalogProvider, Clock, InteractionRecord, KeyValueStore,
    LibraryFingerprint, LibraryProvider, MemoryStore, ProviderError, Reason, ReasonKind,
    RecommendationCache, RecommendationCacheConfig, ScoredBook, Scorer, Similarity, StoreError,
    SystemClock, UserKey,
};

#[cfg(feature = "store-sqlite")]
pub use folio_core::SqliteStore;

pub use folio_recommender::{
    DEFAULT_BATCH_SIZE, RecommendationEngine, RecommendationService, Refresh, TieredBatchSelector,
};
pub use folio_scorer::{SimilarityScorer, SimilarityWeights};

#[cfg(feature = "data")]
pub use folio_data::{CachedCatalog, JsonCatalog, JsonLibrary, open_library};
