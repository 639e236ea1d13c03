//! Authorization-gate behavior across every branch of the transition
//! table, and the unskippable security headers.

use axum::http::StatusCode;
use integration_tests::*;

#[tokio::test]
async fn protected_path_without_session_redirects_to_login() {
    let harness = TestHarness::new().await;

    let res = send(&harness.router, get("/admin")).await;
    assert!(res.status().is_redirection());
    assert_eq!(res.headers()["location"], "/admin/login");
    assert_security_headers(&res);
}

#[tokio::test]
async fn protected_path_with_session_passes_through() {
    let harness = TestHarness::new().await;
    let principal = harness.seed_admin().await;
    let cookie = harness.session_cookie(&principal);

    let res = send(&harness.router, get_with_cookie("/admin", &cookie)).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_security_headers(&res);
}

#[tokio::test]
async fn login_page_with_session_redirects_to_dashboard() {
    let harness = TestHarness::new().await;
    let principal = harness.seed_admin().await;
    let cookie = harness.session_cookie(&principal);

    let res = send(&harness.router, get_with_cookie("/admin/login", &cookie)).await;
    assert!(res.status().is_redirection());
    assert_eq!(res.headers()["location"], "/admin");
    assert_security_headers(&res);
}

#[tokio::test]
async fn login_page_without_session_passes_through() {
    let harness = TestHarness::new().await;

    let res = send(&harness.router, get("/admin/login")).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_security_headers(&res);
}

#[tokio::test]
async fn public_path_passes_through_regardless_of_session() {
    let harness = TestHarness::new().await;
    let principal = harness.seed_admin().await;
    let cookie = harness.session_cookie(&principal);

    let anonymous = send(&harness.router, get("/posts")).await;
    assert_eq!(anonymous.status(), StatusCode::OK);
    assert_security_headers(&anonymous);

    let authenticated = send(&harness.router, get_with_cookie("/posts", &cookie)).await;
    assert_eq!(authenticated.status(), StatusCode::OK);
    assert_security_headers(&authenticated);
}

#[tokio::test]
async fn expired_session_counts_as_no_session() {
    let harness = TestHarness::new().await;
    let principal = harness.seed_admin().await;

    let stale = harness
        .tokens
        .issue(&principal, chrono::Utc::now() - chrono::Duration::days(2))
        .unwrap();
    let res = send(
        &harness.router,
        get_with_cookie("/admin", &format!("atelier_session={stale}")),
    )
    .await;
    assert!(res.status().is_redirection());
    assert_eq!(res.headers()["location"], "/admin/login");
}

#[tokio::test]
async fn garbage_token_counts_as_no_session() {
    let harness = TestHarness::new().await;

    let res = send(
        &harness.router,
        get_with_cookie("/admin", "atelier_session=not-a-token"),
    )
    .await;
    assert!(res.status().is_redirection());
    assert_eq!(res.headers()["location"], "/admin/login");
}

#[tokio::test]
async fn bearer_header_is_an_accepted_fallback() {
    let harness = TestHarness::new().await;
    let principal = harness.seed_admin().await;
    let token = harness
        .tokens
        .issue(&principal, chrono::Utc::now())
        .unwrap();

    let req = axum::http::Request::builder()
        .method("GET")
        .uri("/admin")
        .header("authorization", format!("Bearer {token}"))
        .body(axum::body::Body::empty())
        .unwrap();
    let res = send(&harness.router, req).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn security_headers_cover_error_responses_too() {
    let harness = TestHarness::new().await;

    let res = send(&harness.router, get("/posts/does-not-exist")).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_security_headers(&res);
}
