//! # Domain Models
//!
//! These structs represent the core entities of Atelier: the public
//! portfolio/blog content, the anonymous comments attached to it, and the
//! session/rate-limit types used by the request-gatekeeping layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Fixed identifier of the singleton profile row.
pub const PROFILE_ID: &str = "profile";
/// Fixed identifier of the singleton site-settings row.
pub const SETTINGS_ID: &str = "settings";
/// Comment bodies longer than this are rejected before any other gate runs.
pub const MAX_COMMENT_LEN: usize = 2000;

/// The single administrator account. Looked up by email at login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: Uuid,
    pub email: String,
    /// Argon2 PHC string. The plaintext is never stored or logged.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// The authenticated identity produced by a successful credential check.
/// Everything a session token carries is derived from this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPrincipal {
    pub id: Uuid,
    pub email: String,
}

/// Current version of the session claims layout.
pub const CLAIMS_VERSION: u8 = 1;

/// Versioned JWT claims shared by the token issuer and the edge gate.
///
/// Required fields are enumerated explicitly so the edge-safe decision
/// logic and the full verifier cannot drift apart silently. A token with
/// a different `ver` is rejected as structurally invalid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub ver: u8,
    pub sub: Uuid,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    pub fn principal(&self) -> SessionPrincipal {
        SessionPrincipal {
            id: self.sub,
            email: self.email.clone(),
        }
    }
}

/// Singleton site-owner profile (exactly one row once initialized).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Always [`PROFILE_ID`]; reads and writes target that fixed key.
    pub id: String,
    pub name: String,
    pub headline: String,
    pub bio: String,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Singleton site configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSettings {
    /// Always [`SETTINGS_ID`].
    pub id: String,
    pub title: String,
    pub tagline: Option<String>,
    /// Master switch for the anonymous comment pipeline.
    pub comments_enabled: bool,
    pub updated_at: DateTime<Utc>,
}

/// A blog post. Tags are an owned collection that is always replaced
/// wholesale inside one transaction on update; readers must never
/// observe a partially written tag set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub body: String,
    pub excerpt: Option<String>,
    pub published: bool,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A portfolio project. Same tag-replacement invariant as [`BlogPost`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub featured: bool,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// One entry of the work-experience timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experience {
    pub id: Uuid,
    pub company: String,
    pub role: String,
    pub summary: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub sort_order: i64,
}

/// An anonymous visitor comment. Created only through the admission
/// pipeline; never updated; deleted only by an administrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub body: String,
    /// Redacted identity of the submitter: a one-way keyed digest, kept
    /// for spam correlation and moderation, never displayed.
    #[serde(skip_serializing)]
    pub author_key: String,
    pub created_at: DateTime<Utc>,
}

/// Immutable rate-limit configuration, one instance per protected surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Maximum admitted events per window. Must be >= 1; a policy of 0
    /// would still admit the first request of each window.
    pub max: u32,
    pub window: Duration,
    /// Key namespace, so independent surfaces never share counters.
    pub name: &'static str,
}

impl RateLimitPolicy {
    pub const fn new(name: &'static str, max: u32, window: Duration) -> Self {
        Self { max, window, name }
    }
}

/// A point-in-time view of one counter, as returned by the counter store.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitSnapshot {
    pub count: u32,
    pub reset_at: Instant,
}

/// Structured draft extracted from an uploaded resume by the document
/// parser. The admin reviews and applies it; nothing is persisted
/// automatically.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResumeDraft {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub experience: Vec<ExperienceDraft>,
}

/// Structured draft extracted from an uploaded document for a new blog
/// post. Shares the AI-parsing rate-limit budget with [`ResumeDraft`]
/// imports.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArticleDraft {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// One experience entry of a [`ResumeDraft`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceDraft {
    pub company: String,
    pub role: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
}
