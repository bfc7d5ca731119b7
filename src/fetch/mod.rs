// src/fetch/mod.rs
// =============================================================================
// This module turns a URL into the set of links found on that page.
//
// Submodules:
// - http: The real fetcher, an HTTP GET with reqwest
// - html: Pulls <a href> values out of an HTML document
//
// The crawl engine never talks to reqwest directly. It only sees the
// PageFetcher trait defined here, which lets the tests swap in in-memory
// fetchers (counting calls, blocking forever, ...).
//
// Rust concepts:
// - Traits: An interface that several types can implement
// - async_trait: Lets a trait have async methods and still be used as
//   Arc<dyn PageFetcher>
// =============================================================================

mod html;
mod http;

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::urls::CanonicalUrl;

pub use html::extract_html_links;
pub use http::HttpFetcher;

// Why a single page could not be fetched
//
// All of these are per-URL failures: the worker drops the URL and moves on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("crawl cancelled")]
    Cancelled,
}

/// Fetches one page and returns the canonical links it contains.
///
/// Implementations must give up when either `timeout` elapses or `cancel`
/// fires, whichever comes first. Links are returned unfiltered; keeping the
/// crawl inside its domain is the caller's job.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(
        &self,
        url: &CanonicalUrl,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<HashSet<CanonicalUrl>, FetchError>;
}
