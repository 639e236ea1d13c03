//! # api-adapters
//!
//! The web routing and orchestration layer for Atelier: route table,
//! edge authorization gate, security headers, and the handlers mapping
//! HTTP onto the application services.

pub mod gate;
pub mod handlers;
pub mod metrics;
pub mod state;

pub use metrics::Metrics;
pub use state::AppState;

use axum::middleware;
use axum::routing::{delete, get, post, put};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Builds the full application router.
///
/// Layer order matters: the authorization gate wraps every route, and the
/// security-header layer wraps the gate so even redirects carry the fixed
/// header set.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Public surface
        .route("/healthz", get(handlers::healthz))
        .route("/metrics", get(handlers::metrics))
        .route("/posts", get(handlers::list_posts))
        .route("/posts/{slug}", get(handlers::get_post))
        .route("/comments", post(handlers::submit_comment))
        .route("/projects", get(handlers::list_projects))
        .route("/experience", get(handlers::list_experience))
        .route("/profile", get(handlers::get_profile))
        // Authentication
        .route(
            "/admin/login",
            get(handlers::login_page).post(handlers::login),
        )
        // Admin dashboard (everything below is behind the gate)
        .route("/admin", get(handlers::dashboard))
        .route(
            "/admin/posts",
            get(handlers::admin_list_posts).post(handlers::create_post),
        )
        .route(
            "/admin/posts/{id}",
            put(handlers::update_post).delete(handlers::delete_post),
        )
        .route(
            "/admin/posts/{id}/comments",
            get(handlers::admin_list_comments),
        )
        .route("/admin/comments/{id}", delete(handlers::delete_comment))
        .route("/admin/projects", put(handlers::save_project))
        .route("/admin/projects/{id}", delete(handlers::delete_project))
        .route("/admin/experience", put(handlers::save_experience))
        .route(
            "/admin/experience/{id}",
            delete(handlers::delete_experience),
        )
        .route("/admin/profile", put(handlers::update_profile))
        .route(
            "/admin/settings",
            get(handlers::get_settings).put(handlers::update_settings),
        )
        .route("/admin/password", post(handlers::change_password))
        .route("/admin/import/resume", post(handlers::import_resume))
        .route("/admin/import/article", post(handlers::import_article))
        .route("/admin/uploads", post(handlers::upload_media))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            gate::authorization_gate,
        ))
        .layer(middleware::from_fn(gate::security_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
