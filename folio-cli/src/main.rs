//! Entry point for the `folio` binary.
#![forbid(unsafe_code)]

use env_logger::Env;
use folio_cli::CliError;

#[expect(
    clippy::print_stderr,
    reason = "the binary reports fatal errors on stderr"
)]
fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    match folio_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("folio: {err}");
            std::process::exit(1);
        }
    }
}
