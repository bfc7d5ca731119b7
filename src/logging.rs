// src/logging.rs
// =============================================================================
// Sets up structured logging with tracing-subscriber.
//
// Logs go to stderr, so `--json` output on stdout can be piped straight into
// other tools. The level comes from RUST_LOG when it is set, otherwise from
// the --verbose flag.
// =============================================================================

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

pub fn init(verbose: bool) -> Result<()> {
    let default_level = if verbose {
        "domain_crawler=debug,info"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialise logging: {}", e))
}
