//! # Comment Admission Pipeline
//!
//! The public write path: anonymous visitors may attach a comment to a
//! published post, subject to abuse controls, with no authentication.
//! Gates run in a fixed order with early-exit semantics; every stateful
//! or expensive operation is kept last so a failed gate leaves no trace.

use crate::identity::IdentityRedactor;
use crate::rate_limit::{Decision, RateLimiter, COMMENT_POLICY};
use chrono::Utc;
use domains::error::{AppError, Result};
use domains::models::{Comment, MAX_COMMENT_LEN};
use domains::traits::{ContentRepo, PageCache};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Raw form payload of a comment submission.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentSubmission {
    pub post_id: String,
    pub body: String,
    /// Honeypot. Hidden from human users by styling; any content here
    /// marks the submission as automated.
    #[serde(default)]
    pub website: String,
}

/// Visible outcome of a submission. The honeypot path and the real
/// success path must serialize to byte-identical shapes.
#[derive(Debug, Clone, Serialize)]
pub struct CommentReceipt {
    pub success: bool,
}

impl CommentReceipt {
    fn accepted() -> Self {
        Self { success: true }
    }
}

/// Orchestrates the ordered admission gates for anonymous comments.
pub struct CommentService {
    repo: Arc<dyn ContentRepo>,
    cache: Arc<dyn PageCache>,
    limiter: RateLimiter,
    redactor: Arc<IdentityRedactor>,
}

impl CommentService {
    pub fn new(
        repo: Arc<dyn ContentRepo>,
        cache: Arc<dyn PageCache>,
        limiter: RateLimiter,
        redactor: Arc<IdentityRedactor>,
    ) -> Self {
        Self {
            repo,
            cache,
            limiter,
            redactor,
        }
    }

    /// Runs the full admission pipeline for one submission.
    ///
    /// `forwarded_for` is the raw forwarded-for header value; it is
    /// redacted before any further use and never stored or logged.
    pub async fn submit(
        &self,
        submission: CommentSubmission,
        forwarded_for: Option<&str>,
    ) -> Result<CommentReceipt> {
        // 1. Schema validation. Failures here must not consume quota.
        let body = submission.body.trim();
        if body.is_empty() {
            return Err(AppError::Validation("comment body must not be empty".into()));
        }
        if body.chars().count() > MAX_COMMENT_LEN {
            return Err(AppError::Validation(format!(
                "comment body exceeds {MAX_COMMENT_LEN} characters"
            )));
        }
        let post_id = Uuid::parse_str(submission.post_id.trim())
            .map_err(|_| AppError::Validation("target post id is not valid".into()))?;

        // 2. Honeypot. Report success without persisting anything; the
        //    visible contract stays indistinguishable from a real accept.
        //    Masking applies only to the trigger itself; failures in the
        //    other gates still surface as real errors.
        if !submission.website.trim().is_empty() {
            debug!(%post_id, "honeypot field filled, masking as success");
            return Ok(CommentReceipt::accepted());
        }

        // 3. Target existence + visibility. Absent and unpublished are
        //    deliberately the same outcome.
        let post = self
            .repo
            .find_published_post(post_id)
            .await?
            .ok_or_else(|| AppError::not_found("post", post_id))?;

        if let Some(settings) = self.repo.get_settings().await? {
            if !settings.comments_enabled {
                return Err(AppError::Validation("comments are disabled".into()));
            }
        }

        // 4. Identity redaction + rate limit (5 per 10 minutes).
        let identity = self.redactor.client_key(forwarded_for);
        if let Decision::Denied { retry_after } =
            self.limiter.check(&COMMENT_POLICY, &identity).await?
        {
            return Err(AppError::RateLimited {
                retry_after_secs: retry_after.as_secs().max(1),
            });
        }

        // 5. Persist, tagged with the redacted identity for moderation.
        let comment = Comment {
            id: Uuid::new_v4(),
            post_id,
            body: body.to_string(),
            author_key: identity,
            created_at: Utc::now(),
        };
        self.repo.create_comment(comment).await?;

        // 6. Drop any cached render of the affected post page.
        self.cache.invalidate(&format!("/posts/{}", post.slug));

        Ok(CommentReceipt::accepted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::models::{BlogPost, SiteSettings, SETTINGS_ID};
    use domains::traits::{MockContentRepo, MockCounterStore, MockPageCache};
    use domains::models::RateLimitSnapshot;
    use std::time::{Duration, Instant};

    fn published_post(id: Uuid) -> BlogPost {
        BlogPost {
            id,
            slug: "hello-world".to_string(),
            title: "Hello World".to_string(),
            body: "first".to_string(),
            excerpt: None,
            published: true,
            tags: vec!["rust".to_string()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn submission(post_id: Uuid, body: &str, website: &str) -> CommentSubmission {
        CommentSubmission {
            post_id: post_id.to_string(),
            body: body.to_string(),
            website: website.to_string(),
        }
    }

    fn service(
        repo: MockContentRepo,
        cache: MockPageCache,
        store: MockCounterStore,
    ) -> CommentService {
        CommentService::new(
            Arc::new(repo),
            Arc::new(cache),
            RateLimiter::new(Arc::new(store)),
            Arc::new(IdentityRedactor::new("test-salt")),
        )
    }

    fn allowing_store() -> MockCounterStore {
        let mut store = MockCounterStore::new();
        store.expect_increment().returning(|_, window| {
            Ok(RateLimitSnapshot {
                count: 1,
                reset_at: Instant::now() + window,
            })
        });
        store
    }

    #[tokio::test]
    async fn accepts_valid_submission_and_invalidates_cache() {
        let post_id = Uuid::new_v4();
        let mut repo = MockContentRepo::new();
        repo.expect_find_published_post()
            .returning(move |_| Ok(Some(published_post(post_id))));
        repo.expect_get_settings().returning(|| Ok(None));
        repo.expect_create_comment().times(1).returning(|_| Ok(()));

        let mut cache = MockPageCache::new();
        cache
            .expect_invalidate()
            .withf(|path| path == "/posts/hello-world")
            .times(1)
            .return_const(());

        let receipt = service(repo, cache, allowing_store())
            .submit(submission(post_id, "great post", ""), Some("203.0.113.7"))
            .await
            .unwrap();
        assert!(receipt.success);
    }

    #[tokio::test]
    async fn honeypot_masks_as_success_and_persists_nothing() {
        let mut repo = MockContentRepo::new();
        repo.expect_find_published_post().times(0);
        repo.expect_create_comment().times(0);

        let mut cache = MockPageCache::new();
        cache.expect_invalidate().times(0);

        let mut store = MockCounterStore::new();
        store.expect_increment().times(0);

        let receipt = service(repo, cache, store)
            .submit(
                submission(Uuid::new_v4(), "totally human", "https://spam.example"),
                Some("203.0.113.7"),
            )
            .await
            .unwrap();
        assert!(receipt.success);
    }

    #[tokio::test]
    async fn oversized_body_fails_without_touching_quota() {
        let mut repo = MockContentRepo::new();
        repo.expect_find_published_post().times(0);
        let mut store = MockCounterStore::new();
        store.expect_increment().times(0);

        let err = service(repo, MockPageCache::new(), store)
            .submit(
                submission(Uuid::new_v4(), &"x".repeat(MAX_COMMENT_LEN + 1), ""),
                Some("203.0.113.7"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn empty_body_is_rejected() {
        let err = service(
            MockContentRepo::new(),
            MockPageCache::new(),
            MockCounterStore::new(),
        )
        .submit(submission(Uuid::new_v4(), "   ", ""), None)
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn unpublished_or_missing_post_is_not_found() {
        let mut repo = MockContentRepo::new();
        repo.expect_find_published_post().returning(|_| Ok(None));
        repo.expect_create_comment().times(0);

        let err = service(repo, MockPageCache::new(), allowing_store())
            .submit(submission(Uuid::new_v4(), "hello", ""), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_, _)));
    }

    #[tokio::test]
    async fn disabled_comments_reject_before_consuming_quota() {
        let post_id = Uuid::new_v4();
        let mut repo = MockContentRepo::new();
        repo.expect_find_published_post()
            .returning(move |_| Ok(Some(published_post(post_id))));
        repo.expect_get_settings().returning(|| {
            Ok(Some(SiteSettings {
                id: SETTINGS_ID.to_string(),
                title: "Atelier".to_string(),
                tagline: None,
                comments_enabled: false,
                updated_at: Utc::now(),
            }))
        });

        let mut store = MockCounterStore::new();
        store.expect_increment().times(0);

        let err = service(repo, MockPageCache::new(), store)
            .submit(submission(post_id, "hello", ""), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn over_limit_submission_is_rate_limited() {
        let post_id = Uuid::new_v4();
        let mut repo = MockContentRepo::new();
        repo.expect_find_published_post()
            .returning(move |_| Ok(Some(published_post(post_id))));
        repo.expect_get_settings().returning(|| Ok(None));
        repo.expect_create_comment().times(0);

        let mut store = MockCounterStore::new();
        store.expect_increment().returning(|_, _| {
            Ok(RateLimitSnapshot {
                count: 6,
                reset_at: Instant::now() + Duration::from_secs(300),
            })
        });

        let err = service(repo, MockPageCache::new(), store)
            .submit(submission(post_id, "hello", ""), Some("203.0.113.7"))
            .await
            .unwrap_err();
        match err {
            AppError::RateLimited { retry_after_secs } => {
                assert!(retry_after_secs >= 1);
                assert!(retry_after_secs <= 600);
            }
            other => panic!("expected rate limit, got {other:?}"),
        }
    }
}
