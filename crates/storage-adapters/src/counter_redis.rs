//! # Redis Counter Store
//!
//! Externalized `CounterStore` for deployments that scale past one
//! instance: INCR + PEXPIRE give the same fixed-window semantics as the
//! in-memory store, shared across every process that points at the same
//! Redis. The increment is a single server-side operation, so the
//! atomicity contract holds without any client-side locking.

use async_trait::async_trait;
use deadpool_redis::redis::cmd;
use deadpool_redis::Pool;
use domains::error::{AppError, Result};
use domains::models::RateLimitSnapshot;
use domains::traits::CounterStore;
use std::time::{Duration, Instant};

pub struct RedisCounterStore {
    pool: Pool,
}

impl RedisCounterStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    async fn connection(&self) -> Result<deadpool_redis::Connection> {
        self.pool
            .get()
            .await
            .map_err(|err| AppError::Internal(format!("redis pool: {err}")))
    }
}

fn redis_err(err: deadpool_redis::redis::RedisError) -> AppError {
    AppError::Internal(format!("redis: {err}"))
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn increment(&self, key: &str, window: Duration) -> Result<RateLimitSnapshot> {
        let mut conn = self.connection().await?;

        let count: u32 = cmd("INCR")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(redis_err)?;

        // A fresh key gets its window TTL exactly once; later increments
        // ride the existing expiry.
        if count == 1 {
            let _: () = cmd("PEXPIRE")
                .arg(key)
                .arg(window.as_millis() as u64)
                .query_async(&mut conn)
                .await
                .map_err(redis_err)?;
        }

        let ttl_ms: i64 = cmd("PTTL")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(redis_err)?;
        // PTTL < 0 means the key lost its expiry (e.g., a race with
        // expiration); treat it as a full window from now.
        let remaining = if ttl_ms > 0 {
            Duration::from_millis(ttl_ms as u64)
        } else {
            window
        };

        Ok(RateLimitSnapshot {
            count,
            reset_at: Instant::now() + remaining,
        })
    }

    async fn peek(&self, key: &str) -> Result<Option<RateLimitSnapshot>> {
        let mut conn = self.connection().await?;

        let count: Option<u32> = cmd("GET")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(redis_err)?;
        let Some(count) = count else {
            return Ok(None);
        };

        let ttl_ms: i64 = cmd("PTTL")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(redis_err)?;
        if ttl_ms <= 0 {
            return Ok(None);
        }

        Ok(Some(RateLimitSnapshot {
            count,
            reset_at: Instant::now() + Duration::from_millis(ttl_ms as u64),
        }))
    }

    async fn sweep(&self, _now: Instant) -> Result<()> {
        // Expiry is TTL-driven server-side; nothing to do here.
        Ok(())
    }
}
