// src/crawl/mod.rs
// =============================================================================
// This module is the concurrent crawl engine.
//
// Pieces (leaves first):
// - queue:       shared FIFO of URLs still to visit
// - visited:     shared set that decides which worker fetches which page
// - session:     the per-crawl state every worker gets a handle to
// - worker:      the claim -> fetch -> enqueue loop
// - coordinator: seeds the queue, spawns the workers, waits for them
//
// Features:
// - Stays inside the root's domain (subdomains included)
// - Each page is fetched at most once, however many workers there are
// - Stops cleanly on cancellation, and never leaves workers running
// =============================================================================

mod coordinator;
mod queue;
mod session;
mod visited;
mod worker;

pub use coordinator::{CrawlOutcome, CrawlReport, Crawler, SessionState};
pub use queue::{Checkout, EmptyQueue, WorkQueue};
pub use visited::VisitedSet;
