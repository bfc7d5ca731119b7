// src/crawl/queue.rs
// =============================================================================
// The shared work queue: discovered-but-not-yet-visited URLs.
//
// Why a queue and not a channel?
// - With a zero-buffer (rendezvous) channel, a worker that discovers links
//   blocks until some other worker is free to receive them
// - If every other worker is stuck on a slow page, nobody receives, and the
//   whole crawl deadlocks
// - An unbounded queue never blocks producers, so the crawl always makes
//   progress with whichever workers are still alive
//
// The queue also tracks how many items are "checked out" (dequeued by a
// worker that hasn't finished with them yet). That counter lets a worker tell
// "the crawl is finished" apart from "the queue is empty right now but
// someone is about to add more".
//
// Rust concepts:
// - Mutex: One lock around the VecDeque AND the counter, so both are read in
//   one consistent snapshot
// - Notify: Wakes idle workers when new work appears or the crawl ends
// =============================================================================

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use thiserror::Error;
use tokio::sync::futures::Notified;
use tokio::sync::Notify;

use crate::urls::CanonicalUrl;

/// Returned by `dequeue` when there is nothing to hand out.
/// A normal control signal, not a failure.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("queue is empty")]
pub struct EmptyQueue;

// What a worker gets when it asks for its next item
#[derive(Debug)]
pub enum Checkout {
    /// An item to work on; must be handed back with `check_in`
    Item(CanonicalUrl),
    /// Queue is empty but other workers are mid-item and may add more
    Idle,
    /// Queue is empty and nobody is working: the crawl is over
    Exhausted,
}

#[derive(Debug, Default)]
struct QueueState {
    items: VecDeque<CanonicalUrl>,
    in_flight: usize,
}

/// Unbounded FIFO of canonical URLs, shared by all workers
#[derive(Debug, Default)]
pub struct WorkQueue {
    state: Mutex<QueueState>,
    changed: Notify,
}

impl WorkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a URL to the tail and wakes any idle worker
    pub fn enqueue(&self, url: CanonicalUrl) {
        self.lock().items.push_back(url);
        self.changed.notify_waiters();
    }

    /// Removes and returns the head of the queue
    pub fn dequeue(&self) -> Result<CanonicalUrl, EmptyQueue> {
        // pop_front moves the URL out, the queue keeps no reference to it
        self.lock().items.pop_front().ok_or(EmptyQueue)
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    // Like dequeue, but marks the item as in flight, and decides between
    // Idle and Exhausted in the same critical section.
    pub fn check_out(&self) -> Checkout {
        let mut state = self.lock();
        match state.items.pop_front() {
            Some(url) => {
                state.in_flight += 1;
                Checkout::Item(url)
            }
            None if state.in_flight > 0 => Checkout::Idle,
            None => Checkout::Exhausted,
        }
    }

    // Hands back an item taken with check_out. Call this only after every
    // link discovered from that item has been enqueued.
    pub fn check_in(&self) {
        let drained = {
            let mut state = self.lock();
            state.in_flight = state.in_flight.saturating_sub(1);
            state.in_flight == 0 && state.items.is_empty()
        };

        if drained {
            // Last worker out: wake the idle ones so they can retire
            self.changed.notify_waiters();
        }
    }

    /// Future that resolves on the next enqueue or final check_in.
    ///
    /// Call `enable()` on it before `check_out` so a wakeup that lands
    /// between the check and the await is not lost.
    pub fn changed(&self) -> Notified<'_> {
        self.changed.notified()
    }

    // A poisoned lock only means another worker panicked mid-push/pop; the
    // VecDeque itself is still valid, so keep going with it.
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why std::sync::Mutex and not tokio::sync::Mutex?
//    - We never hold the lock across an .await
//    - Every critical section is a push, a pop or a counter bump
//    - The std mutex is cheaper for short sections like these
//
// 2. What does notify_waiters() do?
//    - Wakes every task currently waiting on changed()
//    - Tasks that start waiting afterwards are NOT woken
//    - That's why workers call enable() before looking at the queue
//
// 3. What is a poisoned mutex?
//    - If a thread panics while holding the lock, the lock is "poisoned"
//    - into_inner() gives us the data anyway
// -----------------------------------------------------------------------------
