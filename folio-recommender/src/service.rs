//! The `get recommendations` operation exposed to the UI layer.
//!
//! [`RecommendationService`] reads the current catalog and the user's
//! library, computes the library fingerprint and only runs the engine when
//! the fingerprint differs from the one stored alongside the cached batch.
//! Provider failures degrade to empty inputs; cache failures are logged and
//! never surface to the caller.

use folio_core::{
    BookRecord, CatalogProvider, InteractionRecord, KeyValueStore, LibraryFingerprint,
    LibraryProvider, RecommendationCache, ScoredBook, Scorer, UserKey,
};
use folio_scorer::SimilarityScorer;
use log::{debug, warn};
use rand::Rng;

use crate::RecommendationEngine;

/// How a refresh produced its result.
#[derive(Debug, Clone, PartialEq)]
pub enum Refresh {
    /// Nothing to recommend; the user's cache entry was removed.
    Cleared,
    /// The library was unchanged and the cached batch was reused.
    Cached(Vec<ScoredBook>),
    /// The engine ran and its batch replaced the cache entry.
    Computed(Vec<ScoredBook>),
}

impl Refresh {
    /// Borrow the resulting batch.
    #[must_use]
    pub fn books(&self) -> &[ScoredBook] {
        match self {
            Self::Cleared => &[],
            Self::Cached(books) | Self::Computed(books) => books,
        }
    }

    /// Consume the outcome and return the batch.
    #[must_use]
    pub fn into_books(self) -> Vec<ScoredBook> {
        match self {
            Self::Cleared => Vec::new(),
            Self::Cached(books) | Self::Computed(books) => books,
        }
    }
}

/// Fingerprint-gated recommendation pipeline over external collaborators.
///
/// # Examples
/// ```
/// use folio_core::test_support::{MemoryCatalog, MemoryLibrary};
/// use folio_core::{BookRecord, InteractionRecord, MemoryStore, RecommendationCache, UserKey};
/// use folio_recommender::{RecommendationEngine, RecommendationService};
/// use folio_scorer::SimilarityScorer;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let service = RecommendationService::new(
///     MemoryCatalog::with_books([BookRecord::new("B", "The Hobbit").with_genre("fantasy")]),
///     MemoryLibrary::shared([InteractionRecord::new("A").mark_saved().with_genre("fantasy")]),
///     RecommendationEngine::new(SimilarityScorer::default()),
///     RecommendationCache::new(MemoryStore::new()),
/// );
/// let mut rng = ChaCha8Rng::seed_from_u64(5);
/// let batch = service.get_recommendations(&UserKey::guest(), 300, &mut rng);
/// assert_eq!(batch.len(), 1);
/// ```
#[derive(Debug)]
pub struct RecommendationService<C, L, K, S = SimilarityScorer> {
    catalog: C,
    library: L,
    engine: RecommendationEngine<S>,
    cache: RecommendationCache<K>,
}

impl<C, L, K, S> RecommendationService<C, L, K, S>
where
    C: CatalogProvider,
    L: LibraryProvider,
    K: KeyValueStore,
    S: Scorer,
{
    /// Assemble a service from its collaborators.
    pub const fn new(
        catalog: C,
        library: L,
        engine: RecommendationEngine<S>,
        cache: RecommendationCache<K>,
    ) -> Self {
        Self {
            catalog,
            library,
            engine,
            cache,
        }
    }

    /// Borrow the recommendation cache.
    pub const fn cache(&self) -> &RecommendationCache<K> {
        &self.cache
    }

    /// Return up to `batch_size` recommendations for `user`.
    ///
    /// A failed catalog read counts as an empty catalog and a failed library
    /// read as an empty library; both yield an empty batch.
    pub fn get_recommendations<R>(&self, user: &UserKey, batch_size: usize, rng: &mut R) -> Vec<ScoredBook>
    where
        R: Rng + ?Sized,
    {
        let interactions = self.library.interactions(user).unwrap_or_else(|err| {
            warn!("library unavailable for {user}: {err}");
            Vec::new()
        });
        let candidates = self.catalog.books().unwrap_or_else(|err| {
            warn!("catalog unavailable: {err}");
            Vec::new()
        });
        self.refresh(user, &interactions, &candidates, batch_size, rng)
            .into_books()
    }

    /// Bring the cached batch for `user` up to date with the given snapshot.
    pub fn refresh<R>(
        &self,
        user: &UserKey,
        interactions: &[InteractionRecord],
        candidates: &[BookRecord],
        batch_size: usize,
        rng: &mut R,
    ) -> Refresh
    where
        R: Rng + ?Sized,
    {
        let fingerprint = LibraryFingerprint::of(interactions);
        if candidates.is_empty() || fingerprint.is_empty() {
            self.clear(user);
            return Refresh::Cleared;
        }

        if let Some(entry) = self.cache.entry(user) {
            if entry.fingerprint == fingerprint {
                debug!("library unchanged for {user}; reusing cached batch");
                return Refresh::Cached(entry.books);
            }
        }

        let batch = self.engine.generate(interactions, candidates, batch_size, rng);
        if batch.is_empty() {
            self.clear(user);
            return Refresh::Cleared;
        }
        if let Err(err) = self.cache.set(user, &fingerprint, &batch) {
            warn!("failed to cache recommendations for {user}: {err}");
        }
        Refresh::Computed(batch)
    }

    fn clear(&self, user: &UserKey) {
        if let Err(err) = self.cache.clear(user) {
            warn!("failed to clear recommendations for {user}: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::MemoryStore;
    use folio_core::test_support::{
        FailingCatalog, FailingLibrary, FailingStore, MemoryCatalog, MemoryLibrary,
    };
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::{fixture, rstest};

    fn catalog() -> MemoryCatalog {
        MemoryCatalog::with_books([
            BookRecord::new("B", "One").with_genre("fantasy"),
            BookRecord::new("C", "Two").with_genre("fantasy"),
            BookRecord::new("D", "Three").with_genre("romance"),
        ])
    }

    fn library() -> Vec<InteractionRecord> {
        vec![InteractionRecord::new("A").mark_favorite().with_genre("fantasy")]
    }

    fn service_with<C, L, K>(catalog: C, library: L, store: K) -> RecommendationService<C, L, K>
    where
        C: CatalogProvider,
        L: LibraryProvider,
        K: KeyValueStore,
    {
        RecommendationService::new(
            catalog,
            library,
            RecommendationEngine::default(),
            RecommendationCache::new(store),
        )
    }

    #[fixture]
    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(3)
    }

    #[rstest]
    fn first_refresh_computes_then_reuses(mut rng: ChaCha8Rng) {
        let service = service_with(catalog(), MemoryLibrary::default(), MemoryStore::new());
        let user = UserKey::new("reader");
        let books = catalog().books().expect("memory catalog");

        let first = service.refresh(&user, &library(), &books, 10, &mut rng);
        assert!(matches!(first, Refresh::Computed(ref batch) if batch.len() == 2));

        let second = service.refresh(&user, &library(), &books, 10, &mut rng);
        assert_eq!(second, Refresh::Cached(first.into_books()));
    }

    #[rstest]
    fn changed_library_recomputes(mut rng: ChaCha8Rng) {
        let service = service_with(catalog(), MemoryLibrary::default(), MemoryStore::new());
        let user = UserKey::new("reader");
        let books = catalog().books().expect("memory catalog");
        let _ = service.refresh(&user, &library(), &books, 10, &mut rng);

        let mut changed = library();
        changed.push(InteractionRecord::new("D").mark_saved());
        let outcome = service.refresh(&user, &changed, &books, 10, &mut rng);
        assert!(matches!(outcome, Refresh::Computed(_)));
    }

    #[rstest]
    fn empty_library_clears_existing_entry(mut rng: ChaCha8Rng) {
        let service = service_with(catalog(), MemoryLibrary::default(), MemoryStore::new());
        let user = UserKey::new("reader");
        let books = catalog().books().expect("memory catalog");
        let _ = service.refresh(&user, &library(), &books, 10, &mut rng);
        assert!(service.cache().get(&user).is_some());

        let outcome = service.refresh(&user, &[], &books, 10, &mut rng);
        assert_eq!(outcome, Refresh::Cleared);
        assert!(service.cache().store().is_empty());
    }

    #[rstest]
    fn empty_catalog_clears_existing_entry(mut rng: ChaCha8Rng) {
        let service = service_with(catalog(), MemoryLibrary::default(), MemoryStore::new());
        let user = UserKey::new("reader");
        let books = catalog().books().expect("memory catalog");
        let _ = service.refresh(&user, &library(), &books, 10, &mut rng);

        assert_eq!(
            service.refresh(&user, &library(), &[], 10, &mut rng),
            Refresh::Cleared
        );
        assert!(service.cache().get(&user).is_none());
    }

    #[rstest]
    fn no_match_is_not_cached(mut rng: ChaCha8Rng) {
        let service = service_with(catalog(), MemoryLibrary::default(), MemoryStore::new());
        let user = UserKey::new("reader");
        let library = [InteractionRecord::new("A").mark_saved().with_genre("horror")];
        let books = catalog().books().expect("memory catalog");
        assert_eq!(
            service.refresh(&user, &library, &books, 10, &mut rng),
            Refresh::Cleared
        );
        assert!(service.cache().store().is_empty());
    }

    #[rstest]
    fn provider_failures_yield_empty_batch(mut rng: ChaCha8Rng) {
        let user = UserKey::guest();
        let no_catalog = service_with(
            FailingCatalog,
            MemoryLibrary::shared(library()),
            MemoryStore::new(),
        );
        assert!(no_catalog.get_recommendations(&user, 10, &mut rng).is_empty());

        let no_library = service_with(catalog(), FailingLibrary, MemoryStore::new());
        assert!(no_library.get_recommendations(&user, 10, &mut rng).is_empty());
    }

    #[rstest]
    fn storage_failure_still_returns_batch(mut rng: ChaCha8Rng) {
        let service = service_with(catalog(), MemoryLibrary::shared(library()), FailingStore);
        let batch = service.get_recommendations(&UserKey::guest(), 10, &mut rng);
        assert_eq!(batch.len(), 2);
    }

    #[rstest]
    fn users_get_their_own_library(mut rng: ChaCha8Rng) {
        let reader = UserKey::new("reader");
        let library = MemoryLibrary::default().with_user(
            reader.clone(),
            [InteractionRecord::new("A").mark_saved().with_genre("romance")],
        );
        let service = service_with(catalog(), library, MemoryStore::new());

        let batch = service.get_recommendations(&reader, 10, &mut rng);
        let ids: Vec<&str> = batch.iter().map(ScoredBook::isbn).collect();
        assert_eq!(ids, ["D"]);
        assert!(service
            .get_recommendations(&UserKey::guest(), 10, &mut rng)
            .is_empty());
    }
}
