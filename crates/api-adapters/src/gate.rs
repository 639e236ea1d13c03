//! # Edge Authorization Gate
//!
//! Runs before any handler as the single choke point enforcing "admin
//! pages require an active session". The gate only checks token presence
//! and structural validity (signature, expiry, claims version). It never
//! hashes a password or touches the repository, so it stays viable in a
//! constrained interception environment.
//!
//! Route classification: any path prefixed `/admin` is protected, except
//! the literal login page.
//!
//! Every response leaves through [`security_headers`], which sits outside
//! this gate so no branch, redirects included, can skip the fixed
//! header set.

use crate::state::AppState;
use axum::extract::{Request, State};
use axum::http::{header, HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use domains::models::SessionPrincipal;
use std::sync::Arc;
use tracing::debug;

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "atelier_session";
/// Root of the protected admin surface.
pub const ADMIN_ROOT: &str = "/admin";
/// The one admin path reachable without a session.
pub const LOGIN_PATH: &str = "/admin/login";

/// Per-request authorization decision.
///
/// | protected | login page | authenticated | action              |
/// |-----------|------------|---------------|---------------------|
/// | yes       | no         | no            | redirect → login    |
/// | yes       | no         | yes           | pass through        |
/// | no        | yes        | yes           | redirect → /admin   |
/// | no        | yes        | no            | pass through        |
/// | no        | no         | —             | pass through        |
pub async fn authorization_gate(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path();
    let is_login = path == LOGIN_PATH;
    let is_protected = is_protected_path(path);

    let claims = session_token(&req).and_then(|token| state.tokens.verify(&token));

    match (is_protected, is_login, claims) {
        (true, _, None) => {
            debug!(path, "unauthenticated request to protected path");
            state.metrics.gate_redirects.inc();
            Redirect::to(LOGIN_PATH).into_response()
        }
        (false, true, Some(_)) => {
            state.metrics.gate_redirects.inc();
            Redirect::to(ADMIN_ROOT).into_response()
        }
        (_, _, claims) => {
            if let Some(claims) = claims {
                req.extensions_mut().insert(claims.principal());
            }
            next.run(req).await
        }
    }
}

/// Injects the fixed security header set into every outbound response.
/// Mounted as the outermost layer; not skippable by any gate branch.
pub async fn security_headers(req: Request, next: Next) -> Response {
    let mut res = next.run(req).await;
    let headers = res.headers_mut();
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(
            "default-src 'self'; img-src 'self' data:; object-src 'none'; frame-ancestors 'none'",
        ),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static("camera=(), microphone=(), geolocation=()"),
    );
    res
}

/// Pulls the session token from the cookie, falling back to a bearer
/// Authorization header for non-browser clients.
fn session_token(req: &Request) -> Option<String> {
    if let Some(cookies) = req.headers().get(header::COOKIE).and_then(|v| v.to_str().ok()) {
        if let Some(token) = cookie_value(cookies, SESSION_COOKIE) {
            return Some(token.to_string());
        }
    }
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.to_string())
}

/// Any path under the admin root except the literal login page.
fn is_protected_path(path: &str) -> bool {
    path.starts_with(ADMIN_ROOT) && path != LOGIN_PATH
}

fn cookie_value<'a>(cookies: &'a str, name: &str) -> Option<&'a str> {
    cookies.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}

/// The handler-side view of an authenticated admin, inserted by the gate
/// on every authenticated pass-through.
pub type AuthenticatedAdmin = axum::Extension<SessionPrincipal>;
