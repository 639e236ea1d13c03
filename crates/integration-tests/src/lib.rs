//! Shared fixtures for the cross-crate end-to-end tests: a fully wired
//! application state over in-memory backends, plus small helpers for
//! driving the router and inspecting responses.

use api_adapters::{AppState, Metrics};
use auth_adapters::{hash_password, CredentialVerifier, TokenIssuer};
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use bytes::Bytes;
use chrono::Utc;
use domains::models::{AdminUser, BlogPost, SessionPrincipal};
use domains::traits::{ContentRepo, CounterStore, PageCache, UserRepo};
use http_body_util::BodyExt;
use secrecy::SecretString;
use services::{CommentService, ContentService, IdentityRedactor, ImportService, RateLimiter};
use std::sync::Arc;
use storage_adapters::{LocalMediaStore, MemoryCounterStore, MemoryPageCache, SqliteRepo};
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "integration-test-signing-secret";
pub const TEST_IDENTITY_SALT: &str = "integration-test-salt";
pub const TEST_ADMIN_EMAIL: &str = "admin@example.com";
pub const TEST_ADMIN_PASSWORD: &str = "correct-horse-battery";

/// A fully wired application over in-memory backends, with handles onto
/// the concrete adapters so tests can assert on stored state.
pub struct TestHarness {
    pub router: Router,
    pub repo: Arc<SqliteRepo>,
    pub cache: Arc<MemoryPageCache>,
    pub counters: Arc<MemoryCounterStore>,
    pub tokens: TokenIssuer,
}

impl TestHarness {
    pub async fn new() -> Self {
        let repo = Arc::new(SqliteRepo::connect("sqlite::memory:").await.unwrap());
        let cache = Arc::new(MemoryPageCache::new());
        let counters = Arc::new(MemoryCounterStore::new());

        let content_repo: Arc<dyn ContentRepo> = repo.clone();
        let user_repo: Arc<dyn UserRepo> = repo.clone();
        let cache_port: Arc<dyn PageCache> = cache.clone();
        let counter_port: Arc<dyn CounterStore> = counters.clone();

        let secret = SecretString::from(TEST_JWT_SECRET);
        let redactor = Arc::new(IdentityRedactor::new(TEST_IDENTITY_SALT));
        let limiter = RateLimiter::new(counter_port);
        let media = Arc::new(LocalMediaStore::new(
            std::env::temp_dir().join(format!("atelier-it-{}", Uuid::new_v4())),
            "/static/uploads".to_string(),
        ));

        let state = Arc::new(AppState {
            content: ContentService::new(content_repo.clone(), cache_port.clone()),
            comments: CommentService::new(
                content_repo,
                cache_port,
                limiter.clone(),
                redactor.clone(),
            ),
            import: ImportService::new(media, None, limiter, redactor),
            verifier: CredentialVerifier::new(user_repo),
            tokens: TokenIssuer::new(&secret),
            metrics: Metrics::new(),
        });

        Self {
            router: api_adapters::router(state),
            repo,
            cache,
            counters,
            tokens: TokenIssuer::new(&secret),
        }
    }

    /// Seeds the admin account and returns its principal.
    pub async fn seed_admin(&self) -> SessionPrincipal {
        let user = AdminUser {
            id: Uuid::new_v4(),
            email: TEST_ADMIN_EMAIL.to_string(),
            password_hash: hash_password(TEST_ADMIN_PASSWORD).unwrap(),
            created_at: Utc::now(),
        };
        self.repo.create_user(user.clone()).await.unwrap();
        SessionPrincipal {
            id: user.id,
            email: user.email,
        }
    }

    /// A valid session cookie for the given principal.
    pub fn session_cookie(&self, principal: &SessionPrincipal) -> String {
        let token = self.tokens.issue(principal, Utc::now()).unwrap();
        format!("atelier_session={token}")
    }

    /// Inserts a post directly through the repository.
    pub async fn seed_post(&self, published: bool) -> BlogPost {
        let now = Utc::now();
        let post = BlogPost {
            id: Uuid::new_v4(),
            slug: format!("post-{}", Uuid::new_v4()),
            title: "Seeded Post".to_string(),
            body: "body".to_string(),
            excerpt: None,
            published,
            tags: vec!["seeded".to_string()],
            created_at: now,
            updated_at: now,
        };
        self.repo.create_post(post.clone()).await.unwrap();
        post
    }
}

/// Drives one request through a clone of the router.
pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    use tower::ServiceExt;
    router.clone().oneshot(request).await.unwrap()
}

pub fn get(path: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(path)
        .body(Body::empty())
        .unwrap()
}

pub fn get_with_cookie(path: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(path)
        .header("cookie", cookie)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(path: &str, json: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

pub fn post_json_from(
    path: &str,
    json: serde_json::Value,
    forwarded_for: &str,
) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .header("x-forwarded-for", forwarded_for)
        .body(Body::from(json.to_string()))
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

/// Asserts the fixed security header set the outermost layer must apply
/// to every response, on every branch.
pub fn assert_security_headers(response: &Response<Body>) {
    for name in [
        "content-security-policy",
        "x-frame-options",
        "x-content-type-options",
        "referrer-policy",
        "permissions-policy",
    ] {
        assert!(
            response.headers().contains_key(name),
            "missing security header {name}"
        );
    }
}
