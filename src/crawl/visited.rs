// src/crawl/visited.rs
// =============================================================================
// The visited set: who gets to fetch which page.
//
// test_and_set() is the ONLY thing that stops two workers from fetching the
// same page. A worker must win the claim before it fetches; if the page was
// already claimed it skips it. Entries are never removed during a crawl, which
// is also what breaks cycles in the link graph (a -> b -> a).
// =============================================================================

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use crate::urls::CanonicalUrl;

#[derive(Debug, Default)]
pub struct VisitedSet {
    keys: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically claims `url`. Returns `true` if it was already claimed.
    ///
    /// For any key this returns `false` exactly once per session.
    pub fn test_and_set(&self, url: &CanonicalUrl) -> bool {
        // insert() returns false when the key was already present
        !self.lock().insert(url.key())
    }

    // Best-effort peek used to avoid queueing obvious duplicates. The answer
    // can be stale by the time the caller acts on it.
    pub fn contains(&self, url: &CanonicalUrl) -> bool {
        self.lock().contains(&url.key())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// All claimed keys, sorted
    pub fn snapshot(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.lock().iter().cloned().collect();
        keys.sort();
        keys
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.keys.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn url(raw: &str) -> CanonicalUrl {
        CanonicalUrl::parse_root(raw).unwrap()
    }

    #[test]
    fn test_first_claim_wins() {
        let visited = VisitedSet::new();
        assert!(!visited.test_and_set(&url("https://a.com/x")));
        assert!(visited.test_and_set(&url("https://a.com/x")));
        assert!(visited.test_and_set(&url("https://a.com/x/")));
    }

    #[test]
    fn test_claim_is_by_key_not_scheme() {
        let visited = VisitedSet::new();
        assert!(!visited.test_and_set(&url("https://a.com/x")));
        assert!(visited.contains(&url("http://www.a.com/x/")));
        assert!(visited.test_and_set(&url("http://www.a.com/x/")));
        assert_eq!(visited.snapshot(), vec!["a.com/x/"]);
    }

    #[test]
    fn test_concurrent_claims_succeed_once() {
        let visited = Arc::new(VisitedSet::new());
        let wins = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let visited = Arc::clone(&visited);
                let wins = Arc::clone(&wins);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        let page = url(&format!("https://a.com/{}", i));
                        if !visited.test_and_set(&page) {
                            wins.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(wins.load(Ordering::SeqCst), 100);
        assert_eq!(visited.len(), 100);
    }
}
