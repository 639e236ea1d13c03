//! # Rate Limiter
//!
//! Fixed-window admission control over a [`CounterStore`], applied
//! identically to the upload, AI-parsing, and comment-submission surfaces
//! and parameterized by policy.
//!
//! The window is *fixed*, not sliding: a client can land up to 2×max
//! events in a span just over one window by straddling the boundary.
//! Accepted tradeoff: the counter stays a single increment per request.

use domains::error::Result;
use domains::models::RateLimitPolicy;
use domains::traits::CounterStore;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Uploads through the admin dashboard: 20 per 15 minutes.
pub const UPLOAD_POLICY: RateLimitPolicy =
    RateLimitPolicy::new("upload", 20, Duration::from_secs(15 * 60));

/// AI-assisted document parsing, shared across both import flows:
/// 10 per 15 minutes.
pub const AI_PARSE_POLICY: RateLimitPolicy =
    RateLimitPolicy::new("ai-parse", 10, Duration::from_secs(15 * 60));

/// Anonymous comment submission: 5 per 10 minutes.
pub const COMMENT_POLICY: RateLimitPolicy =
    RateLimitPolicy::new("comment", 5, Duration::from_secs(10 * 60));

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Request admitted; `remaining` slots left in the current window.
    Allowed { remaining: u32 },
    /// Request rejected until the window resets.
    Denied { retry_after: Duration },
}

/// Policy layer over the counter store. Constructor-injected so tests and
/// independent surfaces never share counters by accident.
#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn CounterStore>,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn CounterStore>) -> Self {
        Self { store }
    }

    /// Applies `policy` to the caller's redacted identity.
    ///
    /// The first call of a fresh window always succeeds (count becomes 1),
    /// so policies must set `max >= 1`.
    pub async fn check(&self, policy: &RateLimitPolicy, identity: &str) -> Result<Decision> {
        debug_assert!(policy.max >= 1, "rate-limit policies must admit at least one event");

        let key = format!("{}:{}", policy.name, identity);
        let entry = self.store.increment(&key, policy.window).await?;

        if entry.count > policy.max {
            let retry_after = entry.reset_at.saturating_duration_since(Instant::now());
            debug!(
                surface = policy.name,
                retry_after_ms = retry_after.as_millis() as u64,
                "rate limit exceeded"
            );
            Ok(Decision::Denied { retry_after })
        } else {
            Ok(Decision::Allowed {
                remaining: policy.max - entry.count,
            })
        }
    }

    /// Non-consuming read of the current window state for `identity`.
    pub async fn remaining(&self, policy: &RateLimitPolicy, identity: &str) -> Result<u32> {
        let key = format!("{}:{}", policy.name, identity);
        let remaining = match self.store.peek(&key).await? {
            Some(entry) if entry.reset_at > Instant::now() => {
                policy.max.saturating_sub(entry.count)
            }
            _ => policy.max,
        };
        Ok(remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::models::RateLimitSnapshot;
    use domains::traits::MockCounterStore;
    use mockall::predicate::eq;

    const TEST_POLICY: RateLimitPolicy =
        RateLimitPolicy::new("test", 3, Duration::from_secs(60));

    fn snapshot(count: u32, reset_in: Duration) -> RateLimitSnapshot {
        RateLimitSnapshot {
            count,
            reset_at: Instant::now() + reset_in,
        }
    }

    #[tokio::test]
    async fn first_call_for_unseen_key_is_allowed() {
        let mut store = MockCounterStore::new();
        store
            .expect_increment()
            .with(eq("test:abc"), eq(Duration::from_secs(60)))
            .returning(|_, window| Ok(snapshot(1, window)));

        let limiter = RateLimiter::new(Arc::new(store));
        let decision = limiter.check(&TEST_POLICY, "abc").await.unwrap();
        assert_eq!(decision, Decision::Allowed { remaining: 2 });
    }

    #[tokio::test]
    async fn call_over_max_is_denied_with_bounded_retry() {
        let mut store = MockCounterStore::new();
        store
            .expect_increment()
            .returning(|_, _| Ok(snapshot(4, Duration::from_secs(42))));

        let limiter = RateLimiter::new(Arc::new(store));
        match limiter.check(&TEST_POLICY, "abc").await.unwrap() {
            Decision::Denied { retry_after } => {
                assert!(retry_after > Duration::ZERO);
                assert!(retry_after <= Duration::from_secs(60));
            }
            other => panic!("expected denial, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn count_at_max_is_still_allowed() {
        let mut store = MockCounterStore::new();
        store
            .expect_increment()
            .returning(|_, _| Ok(snapshot(3, Duration::from_secs(60))));

        let limiter = RateLimiter::new(Arc::new(store));
        let decision = limiter.check(&TEST_POLICY, "abc").await.unwrap();
        assert_eq!(decision, Decision::Allowed { remaining: 0 });
    }

    #[tokio::test]
    async fn keys_are_namespaced_per_surface() {
        let mut store = MockCounterStore::new();
        store
            .expect_increment()
            .with(eq("comment:abc"), eq(COMMENT_POLICY.window))
            .times(1)
            .returning(|_, window| Ok(snapshot(1, window)));

        let limiter = RateLimiter::new(Arc::new(store));
        limiter.check(&COMMENT_POLICY, "abc").await.unwrap();
    }

    #[tokio::test]
    async fn remaining_does_not_consume_quota() {
        let mut store = MockCounterStore::new();
        store.expect_increment().times(0);
        store
            .expect_peek()
            .with(eq("test:abc"))
            .returning(|_| Ok(Some(snapshot(2, Duration::from_secs(30)))));

        let limiter = RateLimiter::new(Arc::new(store));
        assert_eq!(limiter.remaining(&TEST_POLICY, "abc").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn remaining_treats_elapsed_window_as_fresh() {
        let mut store = MockCounterStore::new();
        store.expect_peek().returning(|_| {
            Ok(Some(RateLimitSnapshot {
                count: 3,
                reset_at: Instant::now() - Duration::from_secs(1),
            }))
        });

        let limiter = RateLimiter::new(Arc::new(store));
        assert_eq!(limiter.remaining(&TEST_POLICY, "abc").await.unwrap(), 3);
    }
}
