// src/crawl/session.rs
// =============================================================================
// Everything one crawl shares between its workers, in one struct.
//
// There are no globals: the coordinator builds a Session, wraps it in an Arc
// and hands a clone to every worker. When crawl() returns the last Arc is
// dropped and the queue, the visited set and the counters go with it.
//
// Only `queue` and `visited` are mutated by several workers; the counters are
// atomics used for the final report.
// =============================================================================

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::queue::WorkQueue;
use super::visited::VisitedSet;
use crate::fetch::PageFetcher;
use crate::urls::{CanonicalUrl, Domain};

#[derive(Debug, Default)]
pub struct CrawlStats {
    pub pages_fetched: AtomicUsize,
    pub fetch_failures: AtomicUsize,
}

pub struct Session {
    pub root: CanonicalUrl,
    pub domain: Domain,
    pub fetch_timeout: Duration,
    pub queue: WorkQueue,
    pub visited: VisitedSet,
    pub cancel: CancellationToken,
    pub fetcher: Arc<dyn PageFetcher>,
    pub stats: CrawlStats,
}

impl Session {
    pub fn new(
        root: CanonicalUrl,
        fetch_timeout: Duration,
        fetcher: Arc<dyn PageFetcher>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            domain: Domain::of(&root),
            root,
            fetch_timeout,
            queue: WorkQueue::new(),
            visited: VisitedSet::new(),
            cancel,
            fetcher,
            stats: CrawlStats::default(),
        }
    }

    // Queues the in-domain links that nobody has claimed yet. Returns how
    // many were queued.
    //
    // The visited check here is only a shortcut: a link can still be claimed
    // by someone else before it is dequeued, and the worker's test_and_set
    // catches that.
    pub fn enqueue_links(&self, links: HashSet<CanonicalUrl>) -> usize {
        let mut queued = 0;
        for link in links {
            if !self.domain.contains(&link) || self.visited.contains(&link) {
                continue;
            }
            self.queue.enqueue(link);
            queued += 1;
        }
        queued
    }

    pub fn record_fetch(&self) {
        self.stats.pages_fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.stats.fetch_failures.fetch_add(1, Ordering::Relaxed);
    }
}
