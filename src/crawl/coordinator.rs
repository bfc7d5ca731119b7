// src/crawl/coordinator.rs
// =============================================================================
// The crawl coordinator: seeds the queue, runs the workers, waits for them.
//
// Lifecycle of one crawl session:
//
//   Seeding -> Running -> Terminated                 (every page visited)
//   Seeding -> Running -> Draining -> Terminated     (cancelled)
//   Seeding -> Terminated                            (cancelled during the root fetch)
//
// Seeding:  fetch the root page ourselves, claim it, queue its links. Doing
//           this before any worker starts means the workers begin with a
//           spread of different pages instead of all racing for the root.
// Running:  N workers share the queue and the visited set.
// Draining: the cancel token fired; workers finish the fetch they are in
//           (or abandon it) and stop pulling new work.
//
// crawl() only returns once EVERY worker task has finished, so no background
// work is ever left running behind the caller's back.
// =============================================================================

use std::sync::atomic::Ordering;
use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::session::Session;
use super::worker::{Worker, WorkerExit};
use crate::config::CrawlConfig;
use crate::error::CrawlError;
use crate::fetch::{FetchError, PageFetcher};
use crate::urls::CanonicalUrl;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SessionState {
    Seeding,
    Running,
    Draining,
    Terminated,
}

// How the crawl ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrawlOutcome {
    /// Every reachable in-domain page was visited
    Exhausted,
    /// Stopped early by the cancel token
    Cancelled,
}

/// Summary of a finished crawl
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub root: String,
    pub outcome: CrawlOutcome,
    /// Dedup keys (`host + path`) of every page claimed, sorted
    pub visited: Vec<String>,
    pub pages_fetched: usize,
    pub fetch_failures: usize,
    /// URLs still waiting in the queue (only non-zero after a cancel)
    pub queued_remaining: usize,
}

pub struct Crawler {
    config: CrawlConfig,
    fetcher: Arc<dyn PageFetcher>,
}

impl Crawler {
    pub fn new(config: CrawlConfig, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { config, fetcher }
    }

    /// Crawls every page reachable from `root` inside its domain.
    ///
    /// Returns an error only if the root page itself can't be fetched.
    /// Cancelling `cancel` stops the crawl early, even while the root page
    /// is still loading; the call still waits for all workers to stop
    /// before returning.
    pub async fn crawl(
        &self,
        root: CanonicalUrl,
        cancel: CancellationToken,
    ) -> Result<CrawlReport, CrawlError> {
        let mut state = SessionState::Seeding;
        info!(
            root = %root,
            workers = self.config.worker_count(),
            timeout = ?self.config.fetch_timeout(),
            "starting crawl"
        );

        let session = Arc::new(Session::new(
            root,
            self.config.fetch_timeout(),
            Arc::clone(&self.fetcher),
            cancel,
        ));

        match self.seed(&session).await {
            Ok(()) => {}
            Err(FetchError::Cancelled) => {
                info!("cancelled while fetching the root page, no workers started");
                advance(&mut state, SessionState::Terminated);
                return Ok(build_report(&session, CrawlOutcome::Cancelled));
            }
            Err(source) => {
                return Err(CrawlError::RootUnreachable {
                    url: session.root.to_string(),
                    source,
                });
            }
        }

        advance(&mut state, SessionState::Running);
        let handles: Vec<_> = (0..self.config.worker_count())
            .map(|id| tokio::spawn(Worker::new(id, Arc::clone(&session)).run()))
            .collect();

        let mut all_done = Box::pin(join_all(handles));
        let results = tokio::select! {
            results = &mut all_done => results,
            _ = session.cancel.cancelled() => {
                advance(&mut state, SessionState::Draining);
                all_done.await
            }
        };

        let mut outcome = CrawlOutcome::Exhausted;
        for result in results {
            match result {
                Ok(WorkerExit::Exhausted) => {}
                Ok(WorkerExit::Cancelled) => outcome = CrawlOutcome::Cancelled,
                // Page panics are caught inside the worker; this is a panic in
                // the worker loop itself
                Err(e) => warn!(error = %e, "worker task failed"),
            }
        }

        advance(&mut state, SessionState::Terminated);
        Ok(build_report(&session, outcome))
    }

    // Bootstrap: claim and fetch the root page, queue its in-domain links
    async fn seed(&self, session: &Session) -> Result<(), FetchError> {
        session.visited.test_and_set(&session.root);

        let links = session
            .fetcher
            .fetch(&session.root, session.fetch_timeout, &session.cancel)
            .await?;
        session.record_fetch();

        let queued = session.enqueue_links(links);
        info!(root = %session.root, queued, "seeded queue from root page");
        Ok(())
    }
}

fn build_report(session: &Session, outcome: CrawlOutcome) -> CrawlReport {
    let report = CrawlReport {
        root: session.root.to_string(),
        outcome,
        visited: session.visited.snapshot(),
        pages_fetched: session.stats.pages_fetched.load(Ordering::Relaxed),
        fetch_failures: session.stats.fetch_failures.load(Ordering::Relaxed),
        queued_remaining: session.queue.len(),
    };
    info!(
        outcome = ?report.outcome,
        visited = report.visited.len(),
        failures = report.fetch_failures,
        "crawl finished"
    );
    report
}

fn advance(state: &mut SessionState, next: SessionState) {
    debug_assert!(next > *state, "session state can only move forward");
    info!(from = ?*state, to = ?next, "session state change");
    *state = next;
}
