//! HTTP request handlers

use super::sse::sse_stream;
use super::types::{
    ChatRequest, ChatResponse, DownloadRequest, DownloadResponse, ErrorResponse, SessionResponse,
    SuccessResponse,
};
use super::AppState;
use crate::analytics::track_download;
use crate::runtime::{ChatSession, SubmitOutcome};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Session lifecycle
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(get_session).delete(delete_session))
        // User actions
        .route("/api/sessions/:id/chat", post(send_chat))
        // SSE streaming
        .route("/api/sessions/:id/events", get(stream_session))
        // Download beacon
        .route("/api/downloads", post(record_download))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

async fn find_session(state: &AppState, id: &str) -> Result<Arc<ChatSession>, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session not found: {id}")))
}

fn session_response(session: &ChatSession) -> SessionResponse {
    SessionResponse {
        session_id: session.id().to_string(),
        snapshot: session.snapshot(),
    }
}

// ============================================================
// Session Lifecycle
// ============================================================

async fn create_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let session = state.sessions.create().await;
    Json(session_response(&session))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = find_session(&state, &id).await?;
    Ok(Json(session_response(&session)))
}

async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.sessions.remove(&id).await {
        return Err(AppError::NotFound(format!("Session not found: {id}")));
    }
    Ok(Json(SuccessResponse { success: true }))
}

// ============================================================
// User Actions
// ============================================================

async fn send_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(req) = body?;
    let session = find_session(&state, &id).await?;

    let (accepted, reply) = match session.submit(&req.text, req.delivery()).await {
        SubmitOutcome::Ignored(_) => (false, None),
        SubmitOutcome::Replied(message) | SubmitOutcome::Failed(message) => (true, Some(message)),
    };

    let snapshot = session.snapshot();
    Ok(Json(ChatResponse {
        accepted,
        reply,
        messages: snapshot.messages,
        pending: snapshot.pending,
    }))
}

// ============================================================
// Streaming
// ============================================================

async fn stream_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let session = find_session(&state, &id).await?;

    // Subscribe before taking the snapshot so nothing falls in between
    let broadcast_rx = session.subscribe();
    let snapshot = session.snapshot();

    Ok(sse_stream(session.id().to_string(), snapshot, broadcast_rx))
}

// ============================================================
// Downloads
// ============================================================

async fn record_download(
    State(state): State<AppState>,
    body: Result<Json<DownloadRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = body?;
    let notice = track_download(Arc::clone(&state.analytics), req.kind, req.page);
    Ok((StatusCode::ACCEPTED, Json(DownloadResponse { notice })))
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!("satayoo-chat ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
