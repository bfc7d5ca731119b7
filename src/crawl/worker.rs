// src/crawl/worker.rs
// =============================================================================
// One crawl worker: claim, fetch, queue what was found, repeat.
//
// Each loop iteration:
// 1. Stop if the session was cancelled
// 2. Check out the next URL from the queue
//    - queue empty and nobody else working -> crawl is over, retire
//    - queue empty but others still working -> wait for new links (or cancel)
// 3. Claim the URL in the visited set, unless the crawl was cancelled or
//    someone already claimed it
// 4. Fetch it (bounded by the timeout AND the cancel token)
// 5. Queue the in-domain links it points to, then check the item back in
//
// A failed fetch only loses that one URL: it is logged and dropped, never
// retried, and the worker carries on. The same goes for a fetch that panics;
// the item is still checked back in so the other workers can finish.
// =============================================================================

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{debug, info, warn};

use super::queue::Checkout;
use super::session::Session;
use crate::fetch::FetchError;
use crate::urls::CanonicalUrl;

// Why a worker stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    Exhausted,
    Cancelled,
}

pub struct Worker {
    id: usize,
    session: Arc<Session>,
}

impl Worker {
    pub fn new(id: usize, session: Arc<Session>) -> Self {
        Self { id, session }
    }

    pub async fn run(self) -> WorkerExit {
        debug!(worker = self.id, "worker started");

        let exit = loop {
            if self.session.cancel.is_cancelled() {
                break WorkerExit::Cancelled;
            }

            // Register for wakeups before looking at the queue, otherwise an
            // enqueue landing between check_out and the await would be missed.
            let changed = self.session.queue.changed();
            tokio::pin!(changed);
            changed.as_mut().enable();

            match self.session.queue.check_out() {
                Checkout::Item(url) => {
                    let key = url.key();
                    let visited = AssertUnwindSafe(self.visit(url)).catch_unwind().await;
                    if visited.is_err() {
                        self.session.record_failure();
                        warn!(worker = self.id, url = %key, "page handler panicked, dropping page");
                    }
                    // Must run even after a panic, or in_flight never drains
                    self.session.queue.check_in();
                }
                Checkout::Idle => {
                    tokio::select! {
                        _ = changed.as_mut() => {}
                        _ = self.session.cancel.cancelled() => break WorkerExit::Cancelled,
                    }
                }
                Checkout::Exhausted => break WorkerExit::Exhausted,
            }
        };

        match exit {
            WorkerExit::Exhausted => debug!(worker = self.id, "no more pages, worker retiring"),
            WorkerExit::Cancelled => info!(worker = self.id, "worker spinning down after cancel"),
        }
        exit
    }

    async fn visit(&self, url: CanonicalUrl) {
        let session = &self.session;

        // No new claims or fetches once the crawl has been cancelled
        if session.cancel.is_cancelled() {
            return;
        }

        if session.visited.test_and_set(&url) {
            debug!(worker = self.id, url = %url, "already claimed, skipping");
            return;
        }

        info!(worker = self.id, url = %url, "visiting");

        match session
            .fetcher
            .fetch(&url, session.fetch_timeout, &session.cancel)
            .await
        {
            Ok(links) => {
                session.record_fetch();
                let found = links.len();
                let queued = session.enqueue_links(links);
                debug!(worker = self.id, url = %url, found, queued, "page fetched");
            }
            Err(FetchError::Cancelled) => {
                debug!(worker = self.id, url = %url, "fetch abandoned on cancel");
            }
            Err(error) => {
                session.record_failure();
                debug!(worker = self.id, url = %url, error = %error, "fetch failed, dropping page");
            }
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does a worker wait instead of quitting when the queue is empty?
//    - Another worker may be in the middle of fetching a page
//    - That page can add new links to the queue at any moment
//    - The crawl is only over when the queue is empty AND nobody is working
//
// 2. What is tokio::pin!?
//    - Some futures must not move in memory once they are polled
//    - pin! fixes the future in place on the stack so we can poll it by
//      reference (changed.as_mut()) inside select!
//
// 3. Why check is_cancelled() before claiming a page?
//    - Cancellation can fire at any moment
//    - A page claimed after the signal would never be fetched, yet it would
//      still show up in the report as visited
//
// 4. What does catch_unwind do here?
//    - A panic inside visit() is turned into an Err instead of killing the
//      task, so check_in() below it always runs
//    - AssertUnwindSafe tells the compiler we accept the shared state as it
//      is after a panic (every lock we use tolerates poisoning)
// -----------------------------------------------------------------------------
