// src/config.rs
// =============================================================================
// Crawl session configuration.
//
// Values can come from three places, highest priority first:
// 1. Command-line flags (--workers, --timeout-secs)
// 2. A JSON config file (--config crawler.json)
// 3. Built-in defaults (2 workers, 10 second timeout)
//
// Example config file:
//   {
//     "http_timeout_seconds": 10,
//     "worker_count_integer": 4
//   }
//
// Everything is validated before the crawl touches the network: a bad value
// stops the program with an InvalidConfig error.
// =============================================================================

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_WORKER_COUNT: i64 = 2;
pub const DEFAULT_TIMEOUT_SECS: f64 = 10.0;

/// Validated settings for one crawl session
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlConfig {
    worker_count: usize,
    fetch_timeout: Duration,
}

impl CrawlConfig {
    /// Builds a config, rejecting worker counts below 1 and non-positive
    /// (or non-finite) timeouts.
    pub fn new(worker_count: i64, timeout_secs: f64) -> Result<Self, ConfigError> {
        if worker_count < 1 {
            return Err(ConfigError::WorkerCount(worker_count));
        }
        if !timeout_secs.is_finite() || timeout_secs <= 0.0 {
            return Err(ConfigError::Timeout(timeout_secs));
        }

        Ok(Self {
            worker_count: usize::try_from(worker_count)
                .map_err(|_| ConfigError::WorkerCount(worker_count))?,
            fetch_timeout: Duration::try_from_secs_f64(timeout_secs)
                .map_err(|_| ConfigError::Timeout(timeout_secs))?,
        })
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            worker_count: DEFAULT_WORKER_COUNT as usize,
            fetch_timeout: Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS),
        }
    }
}

// The on-disk shape. Both keys are optional so a file can override just one.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub http_timeout_seconds: Option<f64>,
    pub worker_count_integer: Option<i64>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let unreadable = |reason: String| ConfigError::Unreadable {
            path: path.display().to_string(),
            reason,
        };

        let contents = std::fs::read_to_string(path).map_err(|e| unreadable(e.to_string()))?;
        serde_json::from_str(&contents).map_err(|e| unreadable(e.to_string()))
    }
}

// Merges CLI overrides, the optional file and the defaults, then validates
pub fn resolve(
    file: Option<ConfigFile>,
    workers: Option<i64>,
    timeout_secs: Option<f64>,
) -> Result<CrawlConfig, ConfigError> {
    let file = file.unwrap_or_default();

    let worker_count = workers
        .or(file.worker_count_integer)
        .unwrap_or(DEFAULT_WORKER_COUNT);
    let timeout_secs = timeout_secs
        .or(file.http_timeout_seconds)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    CrawlConfig::new(worker_count, timeout_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_rejects_zero_and_negative_workers() {
        assert_eq!(CrawlConfig::new(0, 10.0), Err(ConfigError::WorkerCount(0)));
        assert_eq!(CrawlConfig::new(-3, 10.0), Err(ConfigError::WorkerCount(-3)));
    }

    #[test]
    fn test_rejects_bad_timeouts() {
        assert!(CrawlConfig::new(2, 0.0).is_err());
        assert!(CrawlConfig::new(2, -1.0).is_err());
        assert!(CrawlConfig::new(2, f64::NAN).is_err());
        // Finite, but too large for a Duration
        assert_eq!(CrawlConfig::new(2, 1e30), Err(ConfigError::Timeout(1e30)));
    }

    #[test]
    fn test_valid_config() {
        let config = CrawlConfig::new(4, 2.5).unwrap();
        assert_eq!(config.worker_count(), 4);
        assert_eq!(config.fetch_timeout(), Duration::from_millis(2500));
    }

    #[test]
    fn test_defaults() {
        let config = resolve(None, None, None).unwrap();
        assert_eq!(config, CrawlConfig::default());
        assert_eq!(config.worker_count(), 2);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_flags_override_file() {
        let file = ConfigFile {
            http_timeout_seconds: Some(3.0),
            worker_count_integer: Some(8),
        };
        let config = resolve(Some(file), Some(1), None).unwrap();
        assert_eq!(config.worker_count(), 1);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_load_json_file() {
        let path = std::env::temp_dir().join(format!("domain-crawler-{}.json", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, r#"{{"http_timeout_seconds": 5, "worker_count_integer": 0}}"#).unwrap();

        let loaded = ConfigFile::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.worker_count_integer, Some(0));
        assert_eq!(
            resolve(Some(loaded), None, None),
            Err(ConfigError::WorkerCount(0))
        );
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = ConfigFile::load(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(ConfigError::Unreadable { .. })));
    }
}
