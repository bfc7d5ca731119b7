//! Concurrent same-domain web crawler.
//!
//! The engine lives in [`crawl`]: a shared work queue, a visited set that
//! guarantees each page is fetched at most once, a pool of workers and the
//! coordinator that runs them. Page downloading sits behind the
//! [`fetch::PageFetcher`] trait so the engine can be driven by any source.

pub mod config;
pub mod crawl;
pub mod error;
pub mod fetch;
pub mod urls;
