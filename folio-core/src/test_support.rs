//! Test-only collaborators used by unit and behaviour tests.
//!
//! Every type here is deterministic and keeps its data in memory.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::{
    BookRecord, CatalogProvider, Clock, InteractionRecord, KeyValueStore, LibraryProvider,
    ProviderError, StoreError, UserKey,
};

/// Catalog returning a fixed list of books.
#[derive(Debug, Default, Clone)]
pub struct MemoryCatalog {
    books: Vec<BookRecord>,
}

impl MemoryCatalog {
    /// Create a catalog from a collection of books.
    pub fn with_books<I>(books: I) -> Self
    where
        I: IntoIterator<Item = BookRecord>,
    {
        Self {
            books: books.into_iter().collect(),
        }
    }
}

impl CatalogProvider for MemoryCatalog {
    fn books(&self) -> Result<Vec<BookRecord>, ProviderError> {
        Ok(self.books.clone())
    }
}

/// Library holding interactions per user.
///
/// Users without their own entry fall back to the shared records.
#[derive(Debug, Default, Clone)]
pub struct MemoryLibrary {
    per_user: HashMap<UserKey, Vec<InteractionRecord>>,
    shared: Vec<InteractionRecord>,
}

impl MemoryLibrary {
    /// Create a library where every user sees `records`.
    pub fn shared<I>(records: I) -> Self
    where
        I: IntoIterator<Item = InteractionRecord>,
    {
        Self {
            per_user: HashMap::new(),
            shared: records.into_iter().collect(),
        }
    }

    /// Give `user` their own interactions.
    #[must_use]
    pub fn with_user<I>(mut self, user: UserKey, records: I) -> Self
    where
        I: IntoIterator<Item = InteractionRecord>,
    {
        self.per_user.insert(user, records.into_iter().collect());
        self
    }
}

impl LibraryProvider for MemoryLibrary {
    fn interactions(&self, user: &UserKey) -> Result<Vec<InteractionRecord>, ProviderError> {
        Ok(self
            .per_user
            .get(user)
            .unwrap_or(&self.shared)
            .clone())
    }
}

fn unavailable(origin: &str) -> ProviderError {
    ProviderError::Io {
        origin: origin.to_owned(),
        message: "unavailable".to_owned(),
    }
}

/// Catalog whose every read fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingCatalog;

impl CatalogProvider for FailingCatalog {
    fn books(&self) -> Result<Vec<BookRecord>, ProviderError> {
        Err(unavailable("catalog"))
    }
}

/// Library whose every read fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingLibrary;

impl LibraryProvider for FailingLibrary {
    fn interactions(&self, _user: &UserKey) -> Result<Vec<InteractionRecord>, ProviderError> {
        Err(unavailable("library"))
    }
}

/// Store whose every operation fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingStore;

fn refused() -> StoreError {
    StoreError::Unavailable {
        message: "store disabled".to_owned(),
    }
}

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(refused())
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(refused())
    }

    fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Err(refused())
    }
}

/// Clock advanced by hand.
#[derive(Debug, Default)]
pub struct ManualClock {
    millis: AtomicU64,
}

impl ManualClock {
    /// Start the clock at `millis` since the Unix epoch.
    #[must_use]
    pub const fn new(millis: u64) -> Self {
        Self {
            millis: AtomicU64::new(millis),
        }
    }

    /// Move the clock forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        let step = u64::try_from(delta.as_millis()).unwrap_or(u64::MAX);
        self.millis.fetch_add(step, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_millis(self.millis.load(Ordering::SeqCst))
    }

    fn now_millis(&self) -> u64 {
        self.millis.load(Ordering::SeqCst)
    }
}
