//! Shared application state wired by the binary and consumed by every
//! handler through `State<Arc<AppState>>`.

use crate::metrics::Metrics;
use auth_adapters::{CredentialVerifier, TokenIssuer};
use services::{CommentService, ContentService, ImportService};

pub struct AppState {
    pub content: ContentService,
    pub comments: CommentService,
    pub import: ImportService,
    pub verifier: CredentialVerifier,
    pub tokens: TokenIssuer,
    pub metrics: Metrics,
}
