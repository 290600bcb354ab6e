#![expect(
    clippy::expect_used,
    reason = "tests should fail fast when setup breaks"
)]

//! Behaviour tests for the per-user recommendation cache.

use std::cell::RefCell;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use folio_core::{
    BookRecord, Clock, InteractionRecord, KeyValueStore, LibraryFingerprint, MemoryStore,
    RecommendationCache, RecommendationCacheConfig, ScoredBook, Similarity, UserKey,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

#[derive(Debug, Default)]
struct SteppedClock(AtomicU64);

impl Clock for SteppedClock {
    fn now(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_millis(self.0.load(Ordering::SeqCst))
    }
}

#[derive(Default)]
struct CacheWorld {
    clock: Arc<SteppedClock>,
    cache: RefCell<Option<RecommendationCache<Arc<MemoryStore>>>>,
    store: Arc<MemoryStore>,
    read: RefCell<Option<Option<Vec<ScoredBook>>>>,
}

impl CacheWorld {
    fn install(&self, config: RecommendationCacheConfig) {
        let cache = RecommendationCache::with_config(Arc::clone(&self.store), config)
            .with_clock(self.clock.clone());
        self.cache.replace(Some(cache));
    }

    fn with_cache<T>(&self, f: impl FnOnce(&RecommendationCache<Arc<MemoryStore>>) -> T) -> T {
        let borrowed = self.cache.borrow();
        let cache = borrowed.as_ref().expect("cache should be installed");
        f(cache)
    }
}

fn batch(size: usize) -> Vec<ScoredBook> {
    (0..size)
        .map(|i| {
            ScoredBook::new(
                BookRecord::new(format!("isbn-{i}"), format!("Book {i}")),
                Similarity::none(),
            )
        })
        .collect()
}

#[fixture]
fn world() -> CacheWorld {
    CacheWorld::default()
}

#[given("an empty recommendation cache")]
fn given_cache(world: &CacheWorld) {
    world.install(RecommendationCacheConfig::default());
}

#[given("a recommendation cache with a {secs} second lifetime")]
fn given_cache_with_ttl(world: &CacheWorld, secs: u64) {
    world.install(RecommendationCacheConfig::default().with_ttl(Duration::from_secs(secs)));
}

#[given("a batch of {size} books cached for {user:word}")]
fn given_batch(world: &CacheWorld, size: usize, user: String) {
    let fingerprint = LibraryFingerprint::of(&[InteractionRecord::new("A").mark_saved()]);
    world.with_cache(|cache| {
        cache
            .set(&UserKey::new(user), &fingerprint, &batch(size))
            .expect("cache write should succeed");
    });
}

#[given("a corrupt entry stored for {user:word}")]
fn given_corrupt(world: &CacheWorld, user: String) {
    let key = world.with_cache(|cache| cache.key_for(&UserKey::new(user)));
    world.store.set(&key, "[not a batch").expect("seed store");
}

#[given("{secs} seconds have passed")]
fn given_elapsed(world: &CacheWorld, secs: u64) {
    world.clock.0.fetch_add(secs * 1_000, Ordering::SeqCst);
}

#[when("{user:word} reads the cache")]
fn when_read(world: &CacheWorld, user: String) {
    let books = world.with_cache(|cache| cache.get(&UserKey::new(user)));
    world.read.replace(Some(books));
}

#[then("{count} cached books are returned")]
fn then_count(world: &CacheWorld, count: usize) {
    let read = world.read.borrow();
    let books = read
        .as_ref()
        .expect("cache should have been read")
        .as_ref()
        .expect("entry should be present");
    assert_eq!(books.len(), count);
}

#[then("no cached books are returned")]
fn then_none(world: &CacheWorld) {
    let read = world.read.borrow();
    assert!(read.as_ref().expect("cache should have been read").is_none());
}

#[then("the entry for {user:word} has been removed")]
fn then_removed(world: &CacheWorld, user: String) {
    let key = world.with_cache(|cache| cache.key_for(&UserKey::new(user)));
    assert!(!world.store.contains_key(&key));
}

#[scenario(path = "tests/features/recommendation_cache.feature", index = 0)]
fn serves_same_user(world: CacheWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/recommendation_cache.feature", index = 1)]
fn isolates_users(world: CacheWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/recommendation_cache.feature", index = 2)]
fn discards_corrupt_entry(world: CacheWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/recommendation_cache.feature", index = 3)]
fn discards_expired_entry(world: CacheWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/recommendation_cache.feature", index = 4)]
fn empty_batch_clears(world: CacheWorld) {
    let _ = world;
}
