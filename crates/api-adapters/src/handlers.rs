//! # Handlers
//!
//! This module coordinates the flow between HTTP requests and the
//! application services. Every public-facing operation catches internal
//! errors here and maps them onto the fixed error taxonomy; nothing
//! unstructured reaches the wire.

use crate::gate::{AuthenticatedAdmin, SESSION_COOKIE};
use crate::state::AppState;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use domains::error::AppError;
use domains::models::{ArticleDraft, ResumeDraft};
use mime::Mime;
use serde::{Deserialize, Serialize};
use serde_json::json;
use services::comments::{CommentReceipt, CommentSubmission};
use services::content::{
    ExperienceInput, NewPost, PostPatch, ProfileInput, ProjectInput, SettingsInput,
};
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

/// Wire-level error wrapper. Internal detail is logged here and never
/// echoed to the client.
pub struct ApiError(AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            AppError::Validation(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "success": false, "error": msg })),
            )
                .into_response(),
            // Deliberately generic: never distinguishes which check failed.
            AppError::Unauthorized(_) => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "success": false, "error": "invalid credentials" })),
            )
                .into_response(),
            AppError::NotFound(entity, _) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "success": false, "error": format!("{entity} not found") })),
            )
                .into_response(),
            AppError::RateLimited { retry_after_secs } => {
                let minutes = retry_after_secs.div_ceil(60);
                let plural = if minutes == 1 { "" } else { "s" };
                let mut res = (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(json!({
                        "success": false,
                        "error": format!("too many requests, try again in about {minutes} minute{plural}"),
                    })),
                )
                    .into_response();
                if let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string()) {
                    res.headers_mut().insert(header::RETRY_AFTER, value);
                }
                res
            }
            AppError::Upstream(detail) => {
                error!(%detail, "upstream collaborator failed");
                (
                    StatusCode::BAD_GATEWAY,
                    Json(json!({ "success": false, "error": "a backing service failed, try again later" })),
                )
                    .into_response()
            }
            AppError::Internal(detail) => {
                error!(%detail, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "success": false, "error": "internal error" })),
                )
                    .into_response()
            }
        }
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

fn forwarded_for(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
}

fn request_mime(headers: &HeaderMap) -> Mime {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
        .unwrap_or(mime::APPLICATION_OCTET_STREAM)
}

// ── Public surface ───────────────────────────────────────────────────────

pub async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "service": "atelier", "version": env!("CARGO_PKG_VERSION") }))
}

pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    (
        [(
            header::CONTENT_TYPE,
            "application/openmetrics-text; version=1.0.0; charset=utf-8",
        )],
        state.metrics.render(),
    )
        .into_response()
}

pub async fn list_posts(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    let posts = state.content.list_posts(false).await?;
    Ok(Json(posts).into_response())
}

pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> ApiResult<Response> {
    let post = state.content.published_post_by_slug(&slug).await?;
    let comments = state.content.comments_for_post(post.id).await?;
    Ok(Json(json!({ "post": post, "comments": comments })).into_response())
}

pub async fn list_projects(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    Ok(Json(state.content.list_projects().await?).into_response())
}

pub async fn list_experience(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    Ok(Json(state.content.list_experience().await?).into_response())
}

pub async fn get_profile(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    Ok(Json(state.content.profile().await?).into_response())
}

pub async fn submit_comment(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(submission): Json<CommentSubmission>,
) -> ApiResult<Json<CommentReceipt>> {
    match state
        .comments
        .submit(submission, forwarded_for(&headers))
        .await
    {
        Ok(receipt) => {
            state.metrics.comments_admitted.inc();
            Ok(Json(receipt))
        }
        Err(err) => {
            match &err {
                AppError::Validation(_) | AppError::NotFound(_, _) => {
                    state.metrics.comments_rejected.inc();
                }
                AppError::RateLimited { .. } => {
                    state.metrics.rate_limited.inc();
                }
                _ => {}
            }
            Err(err.into())
        }
    }
}

// ── Authentication ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginReceipt {
    pub success: bool,
}

pub async fn login_page() -> Json<serde_json::Value> {
    Json(json!({ "message": "POST email and password to log in" }))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Response> {
    let principal = state
        .verifier
        .authorize(&request.email, &request.password)
        .await?
        .ok_or_else(|| AppError::Unauthorized("invalid credentials".into()))?;

    let token = state.tokens.issue(&principal, chrono::Utc::now())?;
    let cookie = format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age=86400");

    let mut res = Json(LoginReceipt { success: true }).into_response();
    res.headers_mut().insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie)
            .map_err(|err| AppError::Internal(format!("cookie encoding: {err}")))?,
    );
    Ok(res)
}

#[derive(Debug, Deserialize)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

pub async fn change_password(
    State(state): State<Arc<AppState>>,
    admin: AuthenticatedAdmin,
    Json(request): Json<PasswordChange>,
) -> ApiResult<Json<serde_json::Value>> {
    state
        .verifier
        .change_password(&admin.email, &request.current_password, &request.new_password)
        .await?;
    Ok(Json(json!({ "success": true })))
}

// ── Admin dashboard ──────────────────────────────────────────────────────

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    admin: AuthenticatedAdmin,
) -> ApiResult<Json<serde_json::Value>> {
    let posts = state.content.list_posts(true).await?;
    let published = posts.iter().filter(|p| p.published).count();
    Ok(Json(json!({
        "admin": admin.email.clone(),
        "posts": posts.len(),
        "published": published,
    })))
}

pub async fn admin_list_posts(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    Ok(Json(state.content.list_posts(true).await?).into_response())
}

pub async fn create_post(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewPost>,
) -> ApiResult<Response> {
    let post = state.content.create_post(input).await?;
    Ok((StatusCode::CREATED, Json(post)).into_response())
}

pub async fn update_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(patch): Json<PostPatch>,
) -> ApiResult<Response> {
    Ok(Json(state.content.update_post(id, patch).await?).into_response())
}

pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.content.delete_post(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn admin_list_comments(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<Uuid>,
) -> ApiResult<Response> {
    Ok(Json(state.content.comments_for_post(post_id).await?).into_response())
}

pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.content.remove_comment(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn save_project(
    State(state): State<Arc<AppState>>,
    Json(input): Json<ProjectInput>,
) -> ApiResult<Response> {
    Ok(Json(state.content.save_project(input).await?).into_response())
}

pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.content.delete_project(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn save_experience(
    State(state): State<Arc<AppState>>,
    Json(input): Json<ExperienceInput>,
) -> ApiResult<Response> {
    Ok(Json(state.content.save_experience(input).await?).into_response())
}

pub async fn delete_experience(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.content.delete_experience(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Json(input): Json<ProfileInput>,
) -> ApiResult<Response> {
    Ok(Json(state.content.update_profile(input).await?).into_response())
}

pub async fn get_settings(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    Ok(Json(state.content.settings().await?).into_response())
}

pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(input): Json<SettingsInput>,
) -> ApiResult<Response> {
    Ok(Json(state.content.update_settings(input).await?).into_response())
}

// ── Imports & uploads ────────────────────────────────────────────────────

pub async fn import_resume(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<ResumeDraft>> {
    let draft = state
        .import
        .import_resume(body, request_mime(&headers), forwarded_for(&headers))
        .await?;
    Ok(Json(draft))
}

pub async fn import_article(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<ArticleDraft>> {
    let draft = state
        .import
        .import_article(body, request_mime(&headers), forwarded_for(&headers))
        .await?;
    Ok(Json(draft))
}

#[derive(Debug, Serialize)]
pub struct UploadReceipt {
    pub url: String,
}

pub async fn upload_media(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadReceipt>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::Validation("malformed multipart body".into()))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type: Mime = field
            .content_type()
            .and_then(|ct| ct.parse().ok())
            .unwrap_or(mime::APPLICATION_OCTET_STREAM);
        let data = field
            .bytes()
            .await
            .map_err(|_| AppError::Validation("upload field could not be read".into()))?;

        let url = state
            .import
            .upload_media(data, &filename, content_type, forwarded_for(&headers))
            .await?;
        return Ok(Json(UploadReceipt { url }));
    }
    Err(AppError::Validation("no file field in upload".into()).into())
}
