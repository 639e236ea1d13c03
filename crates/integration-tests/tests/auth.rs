//! Credential verification through the HTTP boundary: generic failure
//! shapes, session issuance, and password rotation.

use axum::http::StatusCode;
use integration_tests::*;
use serde_json::json;

#[tokio::test]
async fn successful_login_sets_the_session_cookie() {
    let harness = TestHarness::new().await;
    harness.seed_admin().await;

    let res = send(
        &harness.router,
        post_json(
            "/admin/login",
            json!({ "email": TEST_ADMIN_EMAIL, "password": TEST_ADMIN_PASSWORD }),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let cookie = res.headers()["set-cookie"].to_str().unwrap().to_string();
    assert!(cookie.starts_with("atelier_session="));
    assert!(cookie.contains("HttpOnly"));

    // The issued cookie opens the protected surface.
    let session = cookie.split(';').next().unwrap();
    let res = send(&harness.router, get_with_cookie("/admin", session)).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn wrong_password_and_unknown_email_are_indistinguishable() {
    let harness = TestHarness::new().await;
    harness.seed_admin().await;

    let wrong_password = send(
        &harness.router,
        post_json(
            "/admin/login",
            json!({ "email": TEST_ADMIN_EMAIL, "password": "definitely-wrong" }),
        ),
    )
    .await;
    let unknown_email = send(
        &harness.router,
        post_json(
            "/admin/login",
            json!({ "email": "ghost@example.com", "password": "definitely-wrong" }),
        ),
    )
    .await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_bytes(wrong_password).await,
        body_bytes(unknown_email).await
    );
}

#[tokio::test]
async fn password_change_requires_current_password_and_rotates_the_hash() {
    let harness = TestHarness::new().await;
    let principal = harness.seed_admin().await;
    let cookie = harness.session_cookie(&principal);

    // Wrong current password: rejected.
    let res = send(
        &harness.router,
        with_cookie(
            post_json(
                "/admin/password",
                json!({ "current_password": "wrong", "new_password": "a-new-password" }),
            ),
            &cookie,
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Correct current password: accepted.
    let res = send(
        &harness.router,
        with_cookie(
            post_json(
                "/admin/password",
                json!({
                    "current_password": TEST_ADMIN_PASSWORD,
                    "new_password": "a-new-password",
                }),
            ),
            &cookie,
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    // Old password no longer works; the new one does.
    let old = send(
        &harness.router,
        post_json(
            "/admin/login",
            json!({ "email": TEST_ADMIN_EMAIL, "password": TEST_ADMIN_PASSWORD }),
        ),
    )
    .await;
    assert_eq!(old.status(), StatusCode::UNAUTHORIZED);

    let new = send(
        &harness.router,
        post_json(
            "/admin/login",
            json!({ "email": TEST_ADMIN_EMAIL, "password": "a-new-password" }),
        ),
    )
    .await;
    assert_eq!(new.status(), StatusCode::OK);
}

#[tokio::test]
async fn too_short_new_password_is_a_validation_error() {
    let harness = TestHarness::new().await;
    let principal = harness.seed_admin().await;
    let cookie = harness.session_cookie(&principal);

    let res = send(
        &harness.router,
        with_cookie(
            post_json(
                "/admin/password",
                json!({ "current_password": TEST_ADMIN_PASSWORD, "new_password": "short" }),
            ),
            &cookie,
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

fn with_cookie(
    mut request: axum::http::Request<axum::body::Body>,
    cookie: &str,
) -> axum::http::Request<axum::body::Body> {
    request.headers_mut().insert(
        axum::http::header::COOKIE,
        axum::http::HeaderValue::from_str(cookie).unwrap(),
    );
    request
}
