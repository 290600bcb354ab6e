//! Fingerprint command implementation for the Folio CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use folio_core::{LibraryFingerprint, LibraryProvider, UserKey};
use folio_data::JsonLibrary;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{ARG_LIBRARY, ARG_USER, CliError, ENV_FINGERPRINT_LIBRARY, require_existing};

/// CLI arguments for the `fingerprint` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Print the order-independent fingerprint of a user's \
                 library. The fingerprint changes whenever a saved, \
                 favourite, rating or review flag changes, and reads \
                 `empty` for a library with no interactions.",
    about = "Fingerprint a user's library"
)]
#[ortho_config(prefix = "FOLIO")]
pub(crate) struct FingerprintArgs {
    /// Path to the library JSON (an array, or an object keyed by user).
    #[arg(long = ARG_LIBRARY, value_name = "path")]
    #[serde(default)]
    pub(crate) library: Option<Utf8PathBuf>,
    /// User whose library is fingerprinted; defaults to the guest user.
    #[arg(long = ARG_USER, value_name = "id")]
    #[serde(default)]
    pub(crate) user: Option<String>,
}

pub(crate) fn run_fingerprint(args: FingerprintArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let fingerprint = execute_fingerprint(args)?;
    writeln!(writer, "{fingerprint}").map_err(CliError::WriteOutput)
}

fn execute_fingerprint(args: FingerprintArgs) -> Result<LibraryFingerprint, CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let library = merged.library.ok_or(CliError::MissingArgument {
        field: ARG_LIBRARY,
        env: ENV_FINGERPRINT_LIBRARY,
    })?;
    require_existing(&library, ARG_LIBRARY)?;
    let user = merged.user.map_or_else(UserKey::guest, UserKey::new);
    let interactions = JsonLibrary::new(library).interactions(&user)?;
    Ok(LibraryFingerprint::of(&interactions))
}
