//! # Import Service
//!
//! Admin-side import flows that delegate the hard work to external
//! collaborators: object storage for uploads, the document parser for
//! AI-assisted resume/article extraction. Both collaborators are rate
//! limited and their failures are surfaced generically; internal detail
//! stays in the server logs.

use crate::identity::IdentityRedactor;
use crate::rate_limit::{Decision, RateLimiter, AI_PARSE_POLICY, UPLOAD_POLICY};
use bytes::Bytes;
use domains::error::{AppError, Result};
use domains::models::{ArticleDraft, RateLimitPolicy, ResumeDraft};
use domains::traits::{DocumentParser, MediaStorage};
use mime::Mime;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

/// Upload size cap: 10 MiB.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub struct ImportService {
    media: Arc<dyn MediaStorage>,
    parser: Option<Arc<dyn DocumentParser>>,
    limiter: RateLimiter,
    redactor: Arc<IdentityRedactor>,
}

impl ImportService {
    pub fn new(
        media: Arc<dyn MediaStorage>,
        parser: Option<Arc<dyn DocumentParser>>,
        limiter: RateLimiter,
        redactor: Arc<IdentityRedactor>,
    ) -> Self {
        Self {
            media,
            parser,
            limiter,
            redactor,
        }
    }

    /// Stores an uploaded file and returns its public URL.
    /// Rate limited at 20 per 15 minutes per client.
    pub async fn upload_media(
        &self,
        data: Bytes,
        filename: &str,
        content_type: Mime,
        forwarded_for: Option<&str>,
    ) -> Result<String> {
        if data.is_empty() {
            return Err(AppError::Validation("upload is empty".into()));
        }
        if data.len() > MAX_UPLOAD_BYTES {
            return Err(AppError::Validation("upload exceeds 10 MiB".into()));
        }
        if content_type.type_() != mime::IMAGE {
            return Err(AppError::Validation("only image uploads are accepted".into()));
        }

        self.enforce(&UPLOAD_POLICY, forwarded_for).await?;

        let key = format!("{}-{}", Uuid::new_v4(), sanitize_filename(filename));
        match self.media.store(data, &key, &content_type).await {
            Ok(url) => Ok(url),
            Err(err) => {
                warn!(error = %err, "media storage failed");
                Err(AppError::Upstream("upload failed".into()))
            }
        }
    }

    /// Parses an uploaded resume into a structured draft.
    /// Shares the AI-parsing budget (10 per 15 minutes) with
    /// [`Self::import_article`].
    pub async fn import_resume(
        &self,
        data: Bytes,
        content_type: Mime,
        forwarded_for: Option<&str>,
    ) -> Result<ResumeDraft> {
        self.parse_document(data, content_type, forwarded_for).await
    }

    /// Parses an uploaded document into a blog-post draft.
    pub async fn import_article(
        &self,
        data: Bytes,
        content_type: Mime,
        forwarded_for: Option<&str>,
    ) -> Result<ArticleDraft> {
        self.parse_document(data, content_type, forwarded_for).await
    }

    async fn parse_document<T: DeserializeOwned>(
        &self,
        data: Bytes,
        content_type: Mime,
        forwarded_for: Option<&str>,
    ) -> Result<T> {
        if data.is_empty() {
            return Err(AppError::Validation("document is empty".into()));
        }

        self.enforce(&AI_PARSE_POLICY, forwarded_for).await?;

        let parser = self
            .parser
            .as_ref()
            .ok_or_else(|| AppError::Upstream("document parsing is not configured".into()))?;

        let value = match parser.parse(data, &content_type).await {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, "document parser failed");
                return Err(AppError::Upstream("document import failed".into()));
            }
        };
        serde_json::from_value(value).map_err(|err| {
            warn!(error = %err, "document parser returned an unexpected shape");
            AppError::Upstream("document import failed".into())
        })
    }

    async fn enforce(&self, policy: &RateLimitPolicy, forwarded_for: Option<&str>) -> Result<()> {
        let identity = self.redactor.client_key(forwarded_for);
        match self.limiter.check(policy, &identity).await? {
            Decision::Allowed { .. } => Ok(()),
            Decision::Denied { retry_after } => Err(AppError::RateLimited {
                retry_after_secs: retry_after.as_secs().max(1),
            }),
        }
    }
}

/// Keeps alphanumerics, dots, dashes, and underscores; everything else
/// becomes an underscore so keys stay URL- and filesystem-safe.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}
