//! Command-line interface for the Folio recommendation engine.
//!
//! `folio recommend` prints a recommendation batch for one user as JSON;
//! `folio fingerprint` prints the fingerprint of a user's library. Options
//! layer CLI flags over `FOLIO_*` environment variables and configuration
//! files via `ortho_config`.
#![forbid(unsafe_code)]

use camino::Utf8Path;
use clap::{Parser, Subcommand};
use std::io::Write;

mod error;
mod fingerprint;
mod recommend;

pub use error::CliError;

use fingerprint::{FingerprintArgs, run_fingerprint};
use recommend::{DefaultSourceBuilder, RecommendArgs, run_recommend_with};

pub(crate) const ARG_CATALOG: &str = "catalog";
pub(crate) const ARG_OPEN_LIBRARY_URL: &str = "open-library-url";
pub(crate) const ARG_LIBRARY: &str = "library";
pub(crate) const ARG_USER: &str = "user";
pub(crate) const ARG_BATCH_SIZE: &str = "batch-size";
pub(crate) const ARG_CACHE_DIR: &str = "cache-dir";
pub(crate) const ARG_CACHE_DB: &str = "cache-db";
pub(crate) const ARG_SEED: &str = "seed";
pub(crate) const ENV_RECOMMEND_CATALOG: &str = "FOLIO_CMDS_RECOMMEND_CATALOG";
pub(crate) const ENV_RECOMMEND_LIBRARY: &str = "FOLIO_CMDS_RECOMMEND_LIBRARY";
pub(crate) const ENV_FINGERPRINT_LIBRARY: &str = "FOLIO_CMDS_FINGERPRINT_LIBRARY";

/// Run the Folio CLI with the current process arguments and environment,
/// writing command output to stdout.
///
/// # Errors
/// Returns [`CliError`] when arguments are invalid, inputs cannot be read,
/// or output cannot be written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    dispatch(cli, &mut stdout)
}

fn dispatch(cli: Cli, writer: &mut dyn Write) -> Result<(), CliError> {
    match cli.command {
        Command::Recommend(args) => run_recommend_with(args, &DefaultSourceBuilder, writer),
        Command::Fingerprint(args) => run_fingerprint(args, writer),
    }
}

/// Fail unless `path` names an existing regular file.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match folio_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Write `value` as pretty JSON followed by a newline.
pub(crate) fn write_json<T: serde::Serialize>(
    writer: &mut dyn Write,
    value: &T,
) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)
}

#[derive(Debug, Parser)]
#[command(
    name = "folio",
    about = "Personalised book recommendations from a reading library",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Recommend catalog books similar to a user's library.
    Recommend(RecommendArgs),
    /// Print the change-detection fingerprint of a user's library.
    Fingerprint(FingerprintArgs),
}

#[cfg(test)]
mod tests;
