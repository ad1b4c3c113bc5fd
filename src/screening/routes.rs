//! REST endpoints for screening sessions.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use crate::error::SessionError;

use super::manager::SessionManager;

/// Shared state for screening routes.
#[derive(Clone)]
pub struct ScreeningRouteState {
    pub manager: Arc<SessionManager>,
}

#[derive(Debug, Deserialize)]
struct AnswerBody {
    text: String,
}

fn error_response(err: SessionError) -> Response {
    let status = match &err {
        SessionError::NotFound { .. } => StatusCode::NOT_FOUND,
        SessionError::NotReady { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        SessionError::DuplicateCandidate => StatusCode::CONFLICT,
        SessionError::Store(e) => {
            warn!(error = %e, "Candidate store failure");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(serde_json::json!({"error": err.to_string()}))).into_response()
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "talent-scout"
    }))
}

/// POST /api/sessions
///
/// Starts a screening and returns the session id with the first prompt.
async fn create_session(State(state): State<ScreeningRouteState>) -> impl IntoResponse {
    let (session_id, prompt) = state.manager.create().await;
    (
        StatusCode::CREATED,
        Json(serde_json::json!({
            "session_id": session_id,
            "prompt": prompt,
        })),
    )
}

/// GET /api/sessions/{id}
async fn get_session(
    State(state): State<ScreeningRouteState>,
    Path(id): Path<Uuid>,
) -> Response {
    match state.manager.status(id).await {
        Ok(status) => Json(status).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/sessions/{id}/answers
///
/// Body: `{ "text": "..." }`. Returns the next turn, tagged by `type`.
async fn submit_answer(
    State(state): State<ScreeningRouteState>,
    Path(id): Path<Uuid>,
    Json(body): Json<AnswerBody>,
) -> Response {
    match state.manager.submit(id, &body.text).await {
        Ok(turn) => Json(turn).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/sessions/{id}/submit
///
/// Saves a finished screening and closes the session.
async fn submit_session(
    State(state): State<ScreeningRouteState>,
    Path(id): Path<Uuid>,
) -> Response {
    match state.manager.finalize(id).await {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => error_response(e),
    }
}

/// DELETE /api/sessions/{id}
async fn delete_session(
    State(state): State<ScreeningRouteState>,
    Path(id): Path<Uuid>,
) -> Response {
    if state.manager.discard(id).await {
        StatusCode::NO_CONTENT.into_response()
    } else {
        error_response(SessionError::NotFound { id })
    }
}

/// Build the screening REST routes.
pub fn screening_routes(state: ScreeningRouteState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/{id}", get(get_session).delete(delete_session))
        .route("/api/sessions/{id}/answers", post(submit_answer))
        .route("/api/sessions/{id}/submit", post(submit_session))
        .with_state(state)
}
