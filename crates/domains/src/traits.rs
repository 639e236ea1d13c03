//! # Core Traits (Ports)
//!
//! Any adapter must implement these traits to be wired into the binary.
//! Services depend only on these contracts, never on a concrete backend.

use crate::error::Result;
use crate::models::{
    AdminUser, BlogPost, Comment, Experience, Profile, Project, RateLimitSnapshot, SiteSettings,
};
use async_trait::async_trait;
use bytes::Bytes;
use mime::Mime;
#[cfg(any(test, feature = "testing"))]
use mockall::automock;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Data persistence contract for all portfolio/blog content.
///
/// Multi-row mutations (an entity plus its tag collection) must happen
/// inside one atomic transaction: a concurrent reader may observe the old
/// tag set or the new one, never an empty set in between.
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait ContentRepo: Send + Sync {
    // Post Operations
    async fn create_post(&self, post: BlogPost) -> Result<()>;
    async fn update_post(&self, post: BlogPost) -> Result<()>;
    async fn delete_post(&self, id: Uuid) -> Result<()>;
    async fn get_post(&self, id: Uuid) -> Result<Option<BlogPost>>;
    async fn get_post_by_slug(&self, slug: &str) -> Result<Option<BlogPost>>;
    async fn list_posts(&self, include_unpublished: bool) -> Result<Vec<BlogPost>>;
    /// Returns the post only if it exists AND is publicly published.
    async fn find_published_post(&self, id: Uuid) -> Result<Option<BlogPost>>;

    // Comment Operations
    async fn create_comment(&self, comment: Comment) -> Result<()>;
    async fn list_comments(&self, post_id: Uuid) -> Result<Vec<Comment>>;
    async fn delete_comment(&self, id: Uuid) -> Result<()>;
    async fn count_comments(&self) -> Result<i64>;

    // Project Operations
    async fn upsert_project(&self, project: Project) -> Result<()>;
    async fn delete_project(&self, id: Uuid) -> Result<()>;
    async fn list_projects(&self) -> Result<Vec<Project>>;

    // Experience Operations
    async fn upsert_experience(&self, entry: Experience) -> Result<()>;
    async fn delete_experience(&self, id: Uuid) -> Result<()>;
    async fn list_experience(&self) -> Result<Vec<Experience>>;

    // Singleton Records: reads and writes always target the fixed ids.
    async fn get_profile(&self) -> Result<Option<Profile>>;
    async fn upsert_profile(&self, profile: Profile) -> Result<()>;
    async fn get_settings(&self) -> Result<Option<SiteSettings>>;
    async fn upsert_settings(&self, settings: SiteSettings) -> Result<()>;
}

/// Persistence contract for administrator accounts.
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AdminUser>>;
    async fn create_user(&self, user: AdminUser) -> Result<()>;
    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> Result<()>;
}

/// Per-key admission counter used by the rate limiter.
///
/// Implementations must make `increment` atomic with respect to the
/// read-check-write sequence: two concurrent calls for the same key must
/// never both observe the pre-increment count. In-process implementations
/// must not suspend between the read and the write.
///
/// The in-memory store is process-local by design: the rate-limit
/// guarantee is "per observed instance", not "per deployment". Deployments
/// that scale horizontally swap in the externalized store behind this same
/// contract.
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Creates the entry with count=1 (fresh or elapsed window) or
    /// increments it in place, returning the updated snapshot.
    async fn increment(&self, key: &str, window: Duration) -> Result<RateLimitSnapshot>;

    /// Reads without consuming a slot. Used for decisions that must not
    /// burn quota on denial.
    async fn peek(&self, key: &str) -> Result<Option<RateLimitSnapshot>>;

    /// Drops entries whose window elapsed before `now`. Only needed to
    /// bound memory; correctness never depends on it.
    async fn sweep(&self, now: Instant) -> Result<()>;
}

/// Object storage contract: bytes + key in, public URL out.
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait MediaStorage: Send + Sync {
    async fn store(&self, data: Bytes, key: &str, content_type: &Mime) -> Result<String>;
}

/// External document-understanding collaborator: bytes in, structured
/// JSON out, or failure. The caller bounds the duration and maps failures
/// to a generic upstream error.
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait DocumentParser: Send + Sync {
    async fn parse(&self, data: Bytes, content_type: &Mime) -> Result<serde_json::Value>;
}

/// Cached-page invalidation hook, called after content mutations so stale
/// renders of the affected path are dropped.
#[cfg_attr(any(test, feature = "testing"), automock)]
pub trait PageCache: Send + Sync {
    fn invalidate(&self, path: &str);
}
