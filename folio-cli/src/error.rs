//! Error types emitted by the Folio CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use folio_core::{ProviderError, StoreError};
use folio_data::open_library::OpenLibraryError;
use thiserror::Error;

/// Errors emitted by the Folio CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name without dashes.
        field: &'static str,
        /// Environment variable consulted for the option.
        env: &'static str,
    },
    /// Two mutually exclusive options were both supplied.
    #[error("--{first} and --{second} cannot be combined")]
    ConflictingArguments {
        /// First option.
        first: &'static str,
        /// Second option.
        second: &'static str,
    },
    /// An option value is outside its accepted range.
    #[error("invalid --{field}: {reason}")]
    InvalidArgument {
        /// Flag name without dashes.
        field: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },
    /// The requested operation requires a missing compile-time feature.
    #[error("{action} requires the `{feature}` feature to be enabled")]
    MissingFeature {
        /// Cargo feature name.
        feature: &'static str,
        /// Operation that needed it.
        action: &'static str,
    },
    /// A referenced input path does not exist.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// Reading the catalog or library failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),
    /// Opening the cache store failed.
    #[error("failed to open cache store: {0}")]
    OpenStore(#[from] StoreError),
    /// Constructing the Open Library client failed.
    #[error("failed to build Open Library catalog for {base_url:?}: {source}")]
    BuildCatalog {
        /// Configured service root.
        base_url: String,
        /// Construction failure.
        #[source]
        source: OpenLibraryError,
    },
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
