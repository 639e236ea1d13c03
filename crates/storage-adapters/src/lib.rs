//! atelier/crates/storage-adapters/src/lib.rs
//!
//! Concrete backends for the `domains` ports: counters for rate limiting,
//! the SQLite repository, media stores, and the page-cache tracker.

pub mod counter;
pub mod db;
#[cfg(feature = "media-local")]
pub mod media_local;
#[cfg(feature = "media-s3")]
pub mod media_s3;
pub mod page_cache;

#[cfg(feature = "redis")]
pub mod counter_redis;

pub use counter::MemoryCounterStore;
pub use db::SqliteRepo;
#[cfg(feature = "media-local")]
pub use media_local::LocalMediaStore;
#[cfg(feature = "media-s3")]
pub use media_s3::S3MediaStore;
pub use page_cache::MemoryPageCache;

#[cfg(feature = "redis")]
pub use counter_redis::RedisCounterStore;
