// src/fetch/http.rs
// =============================================================================
// The real PageFetcher: downloads a page over HTTP(S) and extracts its links.
//
// Key functionality:
// - One shared reqwest Client (connection pooling across all workers)
// - Every fetch is bounded by BOTH the per-fetch timeout and the session's
//   cancellation token, whichever fires first
// - Non-2xx responses and transport failures become typed FetchErrors
//
// Rust concepts:
// - tokio::select!: Race several futures, keep the first one to finish
// - tokio::time::timeout: Wrap a future so it gives up after a duration
// =============================================================================

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tokio_util::sync::CancellationToken;

use super::html::extract_html_links;
use super::{FetchError, PageFetcher};
use crate::urls::CanonicalUrl;

/// HTTP page fetcher backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    // The per-fetch timeout is applied in fetch(), not on the client, so the
    // same client can serve sessions with different timeouts.
    pub fn new() -> reqwest::Result<Self> {
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(concat!("domain-crawler/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }

    // Downloads the page body. Relative links on a redirected page resolve
    // against where we ended up, so that URL is returned too.
    async fn download(&self, url: &CanonicalUrl) -> Result<(CanonicalUrl, String), FetchError> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(categorize_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let final_url =
            CanonicalUrl::parse_root(response.url().as_str()).unwrap_or_else(|_| url.clone());
        let body = response.text().await.map_err(categorize_error)?;

        Ok((final_url, body))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(
        &self,
        url: &CanonicalUrl,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<HashSet<CanonicalUrl>, FetchError> {
        let (page, body) = tokio::select! {
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            result = tokio::time::timeout(timeout, self.download(url)) => match result {
                Ok(downloaded) => downloaded?,
                Err(_) => return Err(FetchError::Timeout),
            },
        };

        Ok(extract_html_links(&body, &page))
    }
}

// Maps reqwest's error kinds onto our FetchError
fn categorize_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else if let Some(status) = error.status() {
        FetchError::Status(status.as_u16())
    } else {
        FetchError::Transport(error.to_string())
    }
}
