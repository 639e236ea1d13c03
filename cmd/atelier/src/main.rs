//! # Atelier Binary
//!
//! The entry point that assembles the application: configuration,
//! tracing, storage adapters, the gatekeeping services, and the axum
//! server.

use api_adapters::{AppState, Metrics};
use auth_adapters::{CredentialVerifier, TokenIssuer};
use domains::traits::{ContentRepo, CounterStore, DocumentParser, MediaStorage, PageCache, UserRepo};
use secrecy::ExposeSecret;
use services::{CommentService, ContentService, IdentityRedactor, ImportService, RateLimiter};
use std::sync::Arc;
use storage_adapters::{MemoryPageCache, SqliteRepo};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = configs::Settings::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    // 1. Storage
    let repo = Arc::new(SqliteRepo::connect(&settings.database_url).await?);
    let content_repo: Arc<dyn ContentRepo> = repo.clone();
    let user_repo: Arc<dyn UserRepo> = repo.clone();
    let cache: Arc<dyn PageCache> = Arc::new(MemoryPageCache::new());

    // 2. Counter store: process-local by default, shared via Redis when
    //    the deployment scales horizontally.
    #[cfg(feature = "redis")]
    let counters: Arc<dyn CounterStore> = {
        let pool = deadpool_redis::Config::from_url(settings.redis_url.clone())
            .create_pool(Some(deadpool_redis::Runtime::Tokio1))?;
        Arc::new(storage_adapters::RedisCounterStore::new(pool))
    };
    #[cfg(not(feature = "redis"))]
    let counters: Arc<dyn CounterStore> = Arc::new(storage_adapters::MemoryCounterStore::new());

    // 3. Media storage
    #[cfg(feature = "media-s3")]
    let media: Arc<dyn MediaStorage> = Arc::new(
        storage_adapters::S3MediaStore::from_env(
            settings.media.s3_bucket.clone(),
            settings.media.s3_public_base_url.clone(),
        )
        .await,
    );
    #[cfg(not(feature = "media-s3"))]
    let media: Arc<dyn MediaStorage> = Arc::new(storage_adapters::LocalMediaStore::new(
        settings.media.root.clone().into(),
        settings.media.url_prefix.clone(),
    ));

    // 4. The document parser is an external collaborator wired per
    //    deployment; without one, import endpoints answer with a generic
    //    upstream failure.
    let parser: Option<Arc<dyn DocumentParser>> = None;

    // 5. Gatekeeping services
    let redactor = Arc::new(IdentityRedactor::new(
        settings.identity_salt.expose_secret(),
    ));
    let limiter = RateLimiter::new(Arc::clone(&counters));

    let state = Arc::new(AppState {
        content: ContentService::new(Arc::clone(&content_repo), Arc::clone(&cache)),
        comments: CommentService::new(
            Arc::clone(&content_repo),
            Arc::clone(&cache),
            limiter.clone(),
            Arc::clone(&redactor),
        ),
        import: ImportService::new(media, parser, limiter.clone(), Arc::clone(&redactor)),
        verifier: CredentialVerifier::new(user_repo),
        tokens: TokenIssuer::new(&settings.jwt_secret),
        metrics: Metrics::new(),
    });

    let app = api_adapters::router(state);

    tracing::info!(addr = %settings.bind_addr, "atelier starting");
    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
