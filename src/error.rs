// src/error.rs
// =============================================================================
// Typed errors for the crawl engine.
//
// Only two kinds of failure ever stop a crawl before it starts:
// - a bad configuration (worker count, timeout)
// - a root URL that is invalid or cannot be fetched
//
// Everything else (a broken link, a slow page, a 404) is local to one URL and
// is absorbed by the worker that hit it.
//
// The CLI layer wraps these in anyhow::Error; the engine itself returns them
// as-is so callers can match on them.
// =============================================================================

use thiserror::Error;

use crate::fetch::FetchError;

/// Rejected session configuration (fatal, reported before any network I/O)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("worker count must be at least 1, got {0}")]
    WorkerCount(i64),

    #[error("fetch timeout must be a positive number of seconds, got {0}")]
    Timeout(f64),

    #[error("failed to read config file '{path}': {reason}")]
    Unreadable { path: String, reason: String },
}

/// Fatal errors that end a crawl session before any worker is spawned
#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("invalid root URL '{url}': {reason}")]
    InvalidRoot { url: String, reason: String },

    #[error("root page {url} could not be fetched: {source}")]
    RootUnreachable {
        url: String,
        #[source]
        source: FetchError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_message() {
        let err = CrawlError::from(ConfigError::WorkerCount(0));
        assert_eq!(
            err.to_string(),
            "invalid configuration: worker count must be at least 1, got 0"
        );
    }

    #[test]
    fn test_root_unreachable_keeps_source() {
        let err = CrawlError::RootUnreachable {
            url: "https://a.com/".to_string(),
            source: FetchError::Status(503),
        };
        assert!(err.to_string().contains("HTTP status 503"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
