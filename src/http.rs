//! HTTP surface: the `/save-content` endpoint and its error envelope.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};

use crate::auth::{extract_bearer, IdentityProvider};
use crate::config::GithubSettings;
use crate::content;
use crate::github::{GithubClient, GithubError};

pub struct AppState {
    pub identity: Arc<dyn IdentityProvider>,
    pub github: GithubSettings,
}

type SharedState = Arc<AppState>;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/save-content",
            post(save_content)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .layer(middleware::from_fn(cors_headers))
        .with_state(state)
}

/// Append permissive CORS headers to every response, success and error
/// alike. The admin UI is served from a different origin.
async fn cors_headers(req: Request, next: Next) -> Response {
    let mut resp = next.run(req).await;
    let headers = resp.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, Authorization"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    resp
}

// ── GET /health ─────────────────────────────────────────────────────────

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

// ── OPTIONS /save-content ───────────────────────────────────────────────

async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

// ── POST /save-content ──────────────────────────────────────────────────

async fn save_content(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    // 1. Authenticate before anything else
    let credential = extract_bearer(&headers).ok_or_else(|| {
        AppError::Unauthorized("Unauthorized. Provide a Bearer identity token.".to_string())
    })?;
    let principal = state
        .identity
        .verify(&credential)
        .await
        .map_err(|e| AppError::Unauthorized(format!("Unauthorized. {e}")))?;

    // 2. Connection secrets
    let (token, repo) = match (&state.github.token, &state.github.repo) {
        (Some(token), Some(repo)) => (token.clone(), repo.clone()),
        _ => return Err(AppError::MissingConfig(state.github.missing_secrets())),
    };

    // 3. Parse and validate the payload. Raw bytes, parsed here rather
    //    than by an extractor, so a garbage body cannot short-circuit
    //    ahead of the auth and config checks.
    let document: Value = serde_json::from_slice(&body)
        .map_err(|_| AppError::BadRequest("Invalid JSON body".to_string()))?;
    content::validate_document(&document).map_err(AppError::BadRequest)?;

    let client = GithubClient::new(state.github.api_base.clone(), repo, token)
        .map_err(|e| AppError::Internal(format!("failed to build GitHub client: {e}")))?;

    // 4. Read the current revision, then commit against it. If another
    //    save lands in between, GitHub rejects the PUT on the stale SHA.
    let sha = client
        .current_sha(&state.github.content_path, &state.github.branch)
        .await
        .map_err(AppError::UpstreamRead)?;
    tracing::debug!(%sha, path = %state.github.content_path, "fetched current content revision");

    let encoded = content::encode_pretty_base64(&document)
        .map_err(|e| AppError::Internal(format!("failed to encode content: {e}")))?;
    let message = format!(
        "Admin update - {} by {}",
        Utc::now().to_rfc2822(),
        principal.email
    );

    client
        .put_file(
            &state.github.content_path,
            &message,
            &encoded,
            &sha,
            &state.github.branch,
        )
        .await
        .map_err(AppError::UpstreamWrite)?;

    tracing::info!(saved_by = %principal.email, "content committed");

    Ok(Json(json!({
        "success": true,
        "message": "Saved. The site will pick up the new content on its next build.",
        "savedBy": principal.email,
    })))
}

// ── Error handling ──────────────────────────────────────────────────────

pub enum AppError {
    MethodNotAllowed,
    Unauthorized(String),
    MissingConfig(Vec<&'static str>),
    BadRequest(String),
    UpstreamRead(GithubError),
    UpstreamWrite(GithubError),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                json!({ "error": "Method not allowed" }),
            ),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, json!({ "error": msg })),
            Self::MissingConfig(missing) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": "Missing env vars.",
                    "hint": "Set GITHUB_TOKEN and GITHUB_REPO in the service environment.",
                    "missing": missing,
                }),
            ),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            Self::UpstreamRead(err @ GithubError::NotFound { .. }) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": err.to_string(),
                    "hint": "Make sure the content file is pushed to GitHub and GITHUB_REPO points at the connected repository.",
                }),
            ),
            Self::UpstreamRead(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": format!("Read failed: {err}"),
                    "hint": "Check GITHUB_TOKEN and GITHUB_REPO are correct.",
                }),
            ),
            Self::UpstreamWrite(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": format!("Save failed: {err}"),
                    "hint": "Check GITHUB_TOKEN has \"repo\" scope.",
                }),
            ),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": msg })),
        };

        if status.is_server_error() {
            tracing::error!(%status, error = %body["error"], "request failed");
        }

        (status, Json(body)).into_response()
    }
}
