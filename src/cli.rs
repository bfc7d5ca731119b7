// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Example:
//   domain-crawler https://example.com/ --workers 8 --timeout-secs 5 --json
// =============================================================================

use std::path::PathBuf;

use clap::Parser;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
#[derive(Parser, Debug)]
#[command(
    name = "domain-crawler",
    version,
    about = "Visit every page reachable inside one domain, using concurrent workers",
    long_about = "domain-crawler starts at a root URL and follows links that stay inside the \
                  root's domain (subdomains included), fetching each page at most once. \
                  Press Ctrl-C to stop early; pages already in flight are allowed to finish."
)]
pub struct Cli {
    /// Root URL to start from (e.g., https://example.com/)
    ///
    /// Must be an absolute http(s) URL with a host and a path
    pub root_url: String,

    /// Number of concurrent workers (default: 2, or the config file value)
    ///
    /// allow_negative_numbers lets "-1" reach our own validation, which
    /// reports it as an invalid configuration
    #[arg(long, allow_negative_numbers = true)]
    pub workers: Option<i64>,

    /// Per-page fetch timeout in seconds (default: 10, or the config file value)
    #[arg(long, allow_negative_numbers = true)]
    pub timeout_secs: Option<f64>,

    /// JSON config file with http_timeout_seconds / worker_count_integer
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the crawl report as JSON instead of a list
    #[arg(long)]
    pub json: bool,

    /// Log every claim, fetch and skip (debug level)
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_all_flags() {
        let cli = Cli::try_parse_from([
            "domain-crawler",
            "https://example.com/",
            "--workers",
            "4",
            "--timeout-secs",
            "2.5",
            "--config",
            "crawler.json",
            "--json",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.root_url, "https://example.com/");
        assert_eq!(cli.workers, Some(4));
        assert_eq!(cli.timeout_secs, Some(2.5));
        assert_eq!(cli.config, Some(PathBuf::from("crawler.json")));
        assert!(cli.json);
        assert!(cli.verbose);
    }

    #[test]
    fn test_negative_workers_reach_validation() {
        let cli = Cli::try_parse_from(["domain-crawler", "https://example.com/", "--workers", "-1"])
            .unwrap();
        assert_eq!(cli.workers, Some(-1));
    }

    #[test]
    fn test_root_url_is_required() {
        assert!(Cli::try_parse_from(["domain-crawler"]).is_err());
    }
}
