//! # In-Process Page Cache
//!
//! Tracks invalidations of cached page renders. The render layer itself
//! is out of scope; this adapter records which paths went stale so the
//! serving tier can drop them.

use dashmap::DashMap;
use domains::traits::PageCache;
use tracing::debug;

#[derive(Default)]
pub struct MemoryPageCache {
    invalidations: DashMap<String, u64>,
}

impl MemoryPageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times `path` has been invalidated. Used by tests and
    /// cache-debug endpoints.
    pub fn invalidation_count(&self, path: &str) -> u64 {
        self.invalidations.get(path).map(|e| *e.value()).unwrap_or(0)
    }
}

impl PageCache for MemoryPageCache {
    fn invalidate(&self, path: &str) {
        debug!(path, "page cache invalidated");
        *self.invalidations.entry(path.to_string()).or_insert(0) += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_invalidations_per_path() {
        let cache = MemoryPageCache::new();
        assert_eq!(cache.invalidation_count("/posts/a"), 0);
        cache.invalidate("/posts/a");
        cache.invalidate("/posts/a");
        cache.invalidate("/posts/b");
        assert_eq!(cache.invalidation_count("/posts/a"), 2);
        assert_eq!(cache.invalidation_count("/posts/b"), 1);
    }
}
