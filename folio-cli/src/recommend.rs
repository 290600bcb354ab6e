//! Recommend command implementation for the Folio CLI.

use std::io::Write;
use std::sync::Arc;

use camino::Utf8PathBuf;
use clap::Parser;
use folio_core::{
    CatalogProvider, KeyValueStore, LibraryFingerprint, LibraryProvider, MemoryStore,
    RecommendationCache, ScoredBook, UserKey,
};
#[cfg(feature = "store-sqlite")]
use folio_core::SqliteStore;
use folio_data::open_library::OpenLibraryCatalog;
use folio_data::{CachedCatalog, JsonCatalog, JsonLibrary};
use folio_fs::DirStore;
use folio_recommender::{
    DEFAULT_BATCH_SIZE, RecommendationEngine, RecommendationService, Refresh,
};
use folio_scorer::SimilarityScorer;
use log::debug;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::{
    ARG_BATCH_SIZE, ARG_CACHE_DB, ARG_CACHE_DIR, ARG_CATALOG, ARG_LIBRARY, ARG_OPEN_LIBRARY_URL,
    ARG_SEED, ARG_USER, CliError, ENV_RECOMMEND_CATALOG, ENV_RECOMMEND_LIBRARY, require_existing,
    write_json,
};

/// CLI arguments for the `recommend` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Score a catalog against a user's library and print a \
                 tiered, shuffled batch of recommendations as JSON. The \
                 catalog comes from a JSON file or from Open Library; the \
                 batch is cached per user and reused until the library \
                 changes.",
    about = "Recommend books for a user"
)]
#[ortho_config(prefix = "FOLIO")]
pub(crate) struct RecommendArgs {
    /// Path to a JSON array of catalog books.
    #[arg(long = ARG_CATALOG, value_name = "path")]
    #[serde(default)]
    pub(crate) catalog: Option<Utf8PathBuf>,
    /// Fetch the catalog from an Open Library instance at this URL.
    #[arg(long = ARG_OPEN_LIBRARY_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) open_library_url: Option<String>,
    /// Path to the library JSON (an array, or an object keyed by user).
    #[arg(long = ARG_LIBRARY, value_name = "path")]
    #[serde(default)]
    pub(crate) library: Option<Utf8PathBuf>,
    /// User whose library is scored; defaults to the guest user.
    #[arg(long = ARG_USER, value_name = "id")]
    #[serde(default)]
    pub(crate) user: Option<String>,
    /// Maximum number of recommendations.
    #[arg(long = ARG_BATCH_SIZE, value_name = "count")]
    #[serde(default)]
    pub(crate) batch_size: Option<usize>,
    /// Persist caches as JSON files in this directory.
    #[arg(long = ARG_CACHE_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) cache_dir: Option<Utf8PathBuf>,
    /// Persist caches in this SQLite database.
    #[arg(long = ARG_CACHE_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) cache_db: Option<Utf8PathBuf>,
    /// Seed for the tier shuffle; omitted means a fresh random seed.
    #[arg(long = ARG_SEED, value_name = "n")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
}

impl RecommendArgs {
    pub(crate) fn into_config(self) -> Result<RecommendConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RecommendConfig::try_from(merged)
    }
}

/// Where candidate books come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CatalogSource {
    /// Local JSON file.
    File(Utf8PathBuf),
    /// Open Library service root.
    OpenLibrary(String),
}

/// Backing store for the recommendation and catalog caches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CacheStore {
    /// Discarded when the process exits.
    Memory,
    /// One JSON file per key.
    Directory(Utf8PathBuf),
    /// SQLite database file.
    Sqlite(Utf8PathBuf),
}

/// Resolved `recommend` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecommendConfig {
    pub(crate) catalog: CatalogSource,
    pub(crate) library: Utf8PathBuf,
    pub(crate) user: UserKey,
    pub(crate) batch_size: usize,
    pub(crate) cache: CacheStore,
    pub(crate) seed: Option<u64>,
}

impl RecommendConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.library, ARG_LIBRARY)?;
        if let CatalogSource::File(path) = &self.catalog {
            require_existing(path, ARG_CATALOG)?;
        }
        Ok(())
    }
}

impl TryFrom<RecommendArgs> for RecommendConfig {
    type Error = CliError;

    fn try_from(args: RecommendArgs) -> Result<Self, Self::Error> {
        let catalog = match (args.catalog, args.open_library_url) {
            (Some(_), Some(_)) => {
                return Err(CliError::ConflictingArguments {
                    first: ARG_CATALOG,
                    second: ARG_OPEN_LIBRARY_URL,
                });
            }
            (Some(path), None) => CatalogSource::File(path),
            (None, Some(url)) => CatalogSource::OpenLibrary(url),
            (None, None) => {
                return Err(CliError::MissingArgument {
                    field: ARG_CATALOG,
                    env: ENV_RECOMMEND_CATALOG,
                });
            }
        };
        let library = args.library.ok_or(CliError::MissingArgument {
            field: ARG_LIBRARY,
            env: ENV_RECOMMEND_LIBRARY,
        })?;
        let batch_size = args.batch_size.unwrap_or(DEFAULT_BATCH_SIZE);
        if batch_size == 0 {
            return Err(CliError::InvalidArgument {
                field: ARG_BATCH_SIZE,
                reason: "must be at least 1",
            });
        }
        let cache = match (args.cache_dir, args.cache_db) {
            (Some(_), Some(_)) => {
                return Err(CliError::ConflictingArguments {
                    first: ARG_CACHE_DIR,
                    second: ARG_CACHE_DB,
                });
            }
            (Some(dir), None) => CacheStore::Directory(dir),
            (None, Some(path)) => CacheStore::Sqlite(path),
            (None, None) => CacheStore::Memory,
        };

        Ok(Self {
            catalog,
            library,
            user: args.user.map_or_else(UserKey::guest, UserKey::new),
            batch_size,
            cache,
            seed: args.seed,
        })
    }
}

/// How the printed batch was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum BatchSource {
    /// Freshly generated and cached.
    Computed,
    /// Reused because the library fingerprint was unchanged.
    Cached,
    /// Nothing to recommend; the cache entry was cleared.
    Cleared,
}

/// JSON document printed by `folio recommend`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RecommendOutput {
    pub(crate) user: UserKey,
    pub(crate) fingerprint: LibraryFingerprint,
    pub(crate) source: BatchSource,
    pub(crate) books: Vec<ScoredBook>,
}

impl RecommendOutput {
    fn new(user: UserKey, fingerprint: LibraryFingerprint, refresh: Refresh) -> Self {
        let (source, books) = match refresh {
            Refresh::Computed(books) => (BatchSource::Computed, books),
            Refresh::Cached(books) => (BatchSource::Cached, books),
            Refresh::Cleared => (BatchSource::Cleared, Vec::new()),
        };
        Self {
            user,
            fingerprint,
            source,
            books,
        }
    }
}

/// Builds the catalog provider for the current invocation.
pub(crate) trait SourceBuilder {
    fn catalog(
        &self,
        source: &CatalogSource,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Box<dyn CatalogProvider>, CliError>;
}

pub(crate) struct DefaultSourceBuilder;

impl SourceBuilder for DefaultSourceBuilder {
    fn catalog(
        &self,
        source: &CatalogSource,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Box<dyn CatalogProvider>, CliError> {
        match source {
            CatalogSource::File(path) => Ok(Box::new(JsonCatalog::new(path.clone()))),
            CatalogSource::OpenLibrary(base_url) => {
                let remote = OpenLibraryCatalog::new(base_url.clone()).map_err(|source| {
                    CliError::BuildCatalog {
                        base_url: base_url.clone(),
                        source,
                    }
                })?;
                Ok(Box::new(CachedCatalog::new(remote, store)))
            }
        }
    }
}

pub(crate) fn open_store(cache: &CacheStore) -> Result<Arc<dyn KeyValueStore>, CliError> {
    match cache {
        CacheStore::Memory => Ok(Arc::new(MemoryStore::new())),
        CacheStore::Directory(dir) => Ok(Arc::new(DirStore::open(dir)?)),
        #[cfg(feature = "store-sqlite")]
        CacheStore::Sqlite(path) => Ok(Arc::new(SqliteStore::open(path)?)),
        #[cfg(not(feature = "store-sqlite"))]
        CacheStore::Sqlite(_) => Err(CliError::MissingFeature {
            feature: "store-sqlite",
            action: "--cache-db",
        }),
    }
}

pub(crate) fn run_recommend_with(
    args: RecommendArgs,
    builder: &dyn SourceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let output = execute_recommend(args, builder)?;
    write_json(writer, &output)
}

fn execute_recommend(
    args: RecommendArgs,
    builder: &dyn SourceBuilder,
) -> Result<RecommendOutput, CliError> {
    let config = resolve_recommend_config(args)?;
    let store = open_store(&config.cache)?;
    let catalog = builder.catalog(&config.catalog, Arc::clone(&store))?;
    let library = JsonLibrary::new(config.library.clone());

    let interactions = library.interactions(&config.user)?;
    let candidates = catalog.books()?;
    debug!(
        "recommending for {} from {} interactions and {} candidates",
        config.user,
        interactions.len(),
        candidates.len()
    );

    let service = RecommendationService::new(
        catalog,
        library,
        RecommendationEngine::new(SimilarityScorer::default()),
        RecommendationCache::new(store),
    );
    let mut rng = config
        .seed
        .map_or_else(ChaCha8Rng::from_entropy, ChaCha8Rng::seed_from_u64);
    let refresh = service.refresh(
        &config.user,
        &interactions,
        &candidates,
        config.batch_size,
        &mut rng,
    );
    let fingerprint = LibraryFingerprint::of(&interactions);
    Ok(RecommendOutput::new(config.user, fingerprint, refresh))
}

fn resolve_recommend_config(args: RecommendArgs) -> Result<RecommendConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}
