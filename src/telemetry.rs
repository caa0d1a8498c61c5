//! Tracing initialisation for the CLI.
//!
//! Logs go to stderr so that `--json` output on stdout stays parseable.
//! `RUST_LOG` takes precedence over the default level.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Default level: `debug` when verbose, `info` otherwise.
pub fn default_level(verbose: bool) -> Level {
    if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

/// Install the global subscriber. Later calls are ignored.
pub fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose).as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}
