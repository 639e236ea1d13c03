//! atelier/crates/services/src/lib.rs
//!
//! Application services: the request-gatekeeping core (identity
//! redaction, rate limiting, comment admission) plus the thin CRUD
//! orchestration the admin dashboard sits on. Everything here talks to
//! the outside world through the port traits in `domains`.

pub mod comments;
pub mod content;
pub mod identity;
pub mod import;
pub mod rate_limit;

pub use comments::{CommentReceipt, CommentService, CommentSubmission};
pub use content::ContentService;
pub use identity::IdentityRedactor;
pub use import::ImportService;
pub use rate_limit::{Decision, RateLimiter};
