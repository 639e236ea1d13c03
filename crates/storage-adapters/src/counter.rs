//! # In-Memory Counter Store
//!
//! Process-local fixed-window counters behind the `CounterStore` port.
//! State lives in a concurrent map whose entry API makes each increment a
//! single read-modify-write with no suspension point in between, so two
//! concurrent requests for the same key can never both observe the
//! pre-increment count.
//!
//! This store is NOT durable and NOT shared across independently scaled
//! instances; deployments that need a cross-instance guarantee swap in
//! the redis-backed store behind the same contract.

use async_trait::async_trait;
use dashmap::DashMap;
use domains::error::Result;
use domains::models::RateLimitSnapshot;
use domains::traits::CounterStore;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::trace;

/// Minimum spacing between opportunistic sweeps.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

pub struct MemoryCounterStore {
    counters: DashMap<String, (u32, Instant)>,
    last_sweep: Mutex<Instant>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self {
            counters: DashMap::new(),
            last_sweep: Mutex::new(Instant::now()),
        }
    }

    /// Number of live entries; exposed for tests and diagnostics.
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    /// Sweeps at most once per [`SWEEP_INTERVAL`]. Only bounds memory;
    /// expired entries are already treated as fresh by `increment`.
    fn maybe_sweep(&self, now: Instant) {
        let mut last = match self.last_sweep.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if now.duration_since(*last) < SWEEP_INTERVAL {
            return;
        }
        *last = now;
        drop(last);
        self.remove_expired(now);
    }

    fn remove_expired(&self, now: Instant) {
        let before = self.counters.len();
        self.counters.retain(|_, (_, reset_at)| *reset_at >= now);
        let removed = before - self.counters.len();
        if removed > 0 {
            trace!(removed, "swept expired rate-limit entries");
        }
    }
}

impl Default for MemoryCounterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn increment(&self, key: &str, window: Duration) -> Result<RateLimitSnapshot> {
        let now = Instant::now();
        let snapshot = {
            // Entry guard holds the shard lock: the whole read-check-write
            // happens without yielding.
            let mut entry = self
                .counters
                .entry(key.to_string())
                .or_insert((0, now + window));
            let (count, reset_at) = entry.value_mut();
            if *reset_at <= now {
                *count = 1;
                *reset_at = now + window;
            } else {
                *count += 1;
            }
            RateLimitSnapshot {
                count: *count,
                reset_at: *reset_at,
            }
        };
        self.maybe_sweep(now);
        Ok(snapshot)
    }

    async fn peek(&self, key: &str) -> Result<Option<RateLimitSnapshot>> {
        Ok(self.counters.get(key).map(|entry| {
            let (count, reset_at) = *entry.value();
            RateLimitSnapshot { count, reset_at }
        }))
    }

    async fn sweep(&self, now: Instant) -> Result<()> {
        self.remove_expired(now);
        Ok(())
    }
}
