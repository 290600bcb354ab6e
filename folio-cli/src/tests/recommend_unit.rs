//! Focused unit tests covering recommend CLI configuration and execution.

use super::helpers::{Workspace, mixed_catalog, saved_fantasy};
use super::*;
use crate::recommend::{
    BatchSource, CacheStore, CatalogSource, RecommendArgs, RecommendConfig, RecommendOutput,
    SourceBuilder,
};
use folio_core::test_support::MemoryCatalog;
use folio_core::{CatalogProvider, KeyValueStore, UserKey};
use folio_recommender::DEFAULT_BATCH_SIZE;
use rstest::{fixture, rstest};
use std::cell::RefCell;
use std::sync::Arc;

#[fixture]
fn workspace() -> Workspace {
    let workspace = Workspace::new();
    workspace.write_catalog(&mixed_catalog(3, 2));
    workspace.write_library("reader", &[saved_fantasy()]);
    workspace
}

fn args_for(workspace: &Workspace) -> RecommendArgs {
    RecommendArgs {
        catalog: Some(workspace.catalog_path()),
        library: Some(workspace.library_path()),
        user: Some("reader".to_owned()),
        seed: Some(11),
        ..RecommendArgs::default()
    }
}

fn run_to_output(args: RecommendArgs, builder: &dyn SourceBuilder) -> RecommendOutput {
    let mut buffer = Vec::new();
    run_recommend_with(args, builder, &mut buffer).expect("recommend should succeed");
    serde_json::from_slice(&buffer).expect("output should be JSON")
}

#[derive(Default)]
struct StubSourceBuilder {
    requested: RefCell<Option<CatalogSource>>,
}

impl SourceBuilder for StubSourceBuilder {
    fn catalog(
        &self,
        source: &CatalogSource,
        _store: Arc<dyn KeyValueStore>,
    ) -> Result<Box<dyn CatalogProvider>, CliError> {
        self.requested.replace(Some(source.clone()));
        Ok(Box::new(MemoryCatalog::with_books(mixed_catalog(2, 0))))
    }
}

#[rstest]
fn converting_without_a_catalog_errors(workspace: Workspace) {
    let args = RecommendArgs {
        catalog: None,
        ..args_for(&workspace)
    };

    let err = RecommendConfig::try_from(args).expect_err("missing catalog should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_CATALOG);
            assert_eq!(env, ENV_RECOMMEND_CATALOG);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn converting_without_a_library_errors(workspace: Workspace) {
    let args = RecommendArgs {
        library: None,
        ..args_for(&workspace)
    };

    let err = RecommendConfig::try_from(args).expect_err("missing library should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_LIBRARY);
            assert_eq!(env, ENV_RECOMMEND_LIBRARY);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
#[case::catalog_sources(
    RecommendArgs { open_library_url: Some("https://openlibrary.org".to_owned()), ..RecommendArgs::default() },
    (ARG_CATALOG, ARG_OPEN_LIBRARY_URL),
)]
#[case::cache_stores(
    RecommendArgs { cache_dir: Some("cache".into()), cache_db: Some("cache.db".into()), ..RecommendArgs::default() },
    (ARG_CACHE_DIR, ARG_CACHE_DB),
)]
fn conflicting_options_are_rejected(
    workspace: Workspace,
    #[case] overrides: RecommendArgs,
    #[case] expected: (&str, &str),
) {
    let base = args_for(&workspace);
    let args = RecommendArgs {
        open_library_url: overrides.open_library_url,
        cache_dir: overrides.cache_dir,
        cache_db: overrides.cache_db,
        ..base
    };

    let err = RecommendConfig::try_from(args).expect_err("conflict should error");
    match err {
        CliError::ConflictingArguments { first, second } => {
            assert_eq!((first, second), expected);
        }
        other => panic!("expected ConflictingArguments, found {other:?}"),
    }
}

#[rstest]
fn zero_batch_size_is_rejected(workspace: Workspace) {
    let args = RecommendArgs {
        batch_size: Some(0),
        ..args_for(&workspace)
    };

    let err = RecommendConfig::try_from(args).expect_err("zero batch should error");
    assert!(matches!(
        err,
        CliError::InvalidArgument {
            field: ARG_BATCH_SIZE,
            ..
        }
    ));
}

#[rstest]
fn config_applies_defaults(workspace: Workspace) {
    let args = RecommendArgs {
        user: None,
        seed: None,
        ..args_for(&workspace)
    };

    let config = RecommendConfig::try_from(args).expect("config should build");
    assert_eq!(config.catalog, CatalogSource::File(workspace.catalog_path()));
    assert_eq!(config.user, UserKey::guest());
    assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
    assert_eq!(config.cache, CacheStore::Memory);
    assert_eq!(config.seed, None);
}

#[rstest]
fn validate_sources_reports_missing_catalog(workspace: Workspace) {
    let args = RecommendArgs {
        catalog: Some(workspace.path("absent.json")),
        ..args_for(&workspace)
    };

    let config = RecommendConfig::try_from(args).expect("config should build");
    let err = config.validate_sources().expect_err("missing catalog should fail");
    match err {
        CliError::MissingSourceFile { field, path } => {
            assert_eq!(field, ARG_CATALOG);
            assert_eq!(path, workspace.path("absent.json"));
        }
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn recommend_with_the_same_seed_is_reproducible(workspace: Workspace) {
    let first = run_to_output(args_for(&workspace), &DefaultSourceBuilder);
    let second = run_to_output(args_for(&workspace), &DefaultSourceBuilder);

    assert_eq!(first.source, BatchSource::Computed);
    assert_eq!(first.books, second.books);
    assert_eq!(first.user, UserKey::new("reader"));
    assert!(!first.fingerprint.is_empty());
}

#[rstest]
fn open_library_source_goes_through_the_builder(workspace: Workspace) {
    let args = RecommendArgs {
        catalog: None,
        open_library_url: Some("https://openlibrary.test".to_owned()),
        ..args_for(&workspace)
    };
    let builder = StubSourceBuilder::default();

    let output = run_to_output(args, &builder);

    assert_eq!(
        builder.requested.borrow().clone(),
        Some(CatalogSource::OpenLibrary("https://openlibrary.test".to_owned()))
    );
    assert_eq!(output.books.len(), 2);
}

#[rstest]
#[case::even_tiers(9, 6, 6)]
#[case::fewer_matches_than_requested(9, 300, 9)]
#[case::short_quota_is_not_backfilled(3, 2, 1)]
fn batch_size_bounds_the_output(
    workspace: Workspace,
    #[case] matches: usize,
    #[case] batch_size: usize,
    #[case] expected: usize,
) {
    workspace.write_catalog(&mixed_catalog(matches, 2));
    let args = RecommendArgs {
        batch_size: Some(batch_size),
        ..args_for(&workspace)
    };

    let output = run_to_output(args, &DefaultSourceBuilder);
    assert_eq!(output.books.len(), expected);
}

#[cfg(feature = "store-sqlite")]
#[rstest]
fn sqlite_cache_serves_the_second_run(workspace: Workspace) {
    let args = RecommendArgs {
        cache_db: Some(workspace.path("cache.db")),
        ..args_for(&workspace)
    };

    let first = run_to_output(args.clone(), &DefaultSourceBuilder);
    let second = run_to_output(args, &DefaultSourceBuilder);

    assert_eq!(first.source, BatchSource::Computed);
    assert_eq!(second.source, BatchSource::Cached);
    assert_eq!(first.books, second.books);
}

#[rstest]
fn library_change_invalidates_the_cached_batch(workspace: Workspace) {
    let args = RecommendArgs {
        cache_dir: Some(workspace.path("cache")),
        ..args_for(&workspace)
    };
    let first = run_to_output(args.clone(), &DefaultSourceBuilder);

    workspace.write_library("reader", &[saved_fantasy().mark_favorite()]);
    let second = run_to_output(args, &DefaultSourceBuilder);

    assert_eq!(first.source, BatchSource::Computed);
    assert_eq!(second.source, BatchSource::Computed);
    assert_ne!(first.fingerprint, second.fingerprint);
}

#[rstest]
#[case::email("first..last@example.com")]
#[case::uid("uid:42")]
fn directory_cache_accepts_any_user_identity(workspace: Workspace, #[case] user: &str) {
    workspace.write_library(user, &[saved_fantasy()]);
    let args = RecommendArgs {
        user: Some(user.to_owned()),
        cache_dir: Some(workspace.path("cache")),
        ..args_for(&workspace)
    };

    let first = run_to_output(args.clone(), &DefaultSourceBuilder);
    let second = run_to_output(args, &DefaultSourceBuilder);

    assert_eq!(first.source, BatchSource::Computed);
    assert_eq!(second.source, BatchSource::Cached);
}
