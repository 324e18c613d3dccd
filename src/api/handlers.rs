//! HTTP request handlers

use super::types::{ChatRequest, ChatResponse, ErrorResponse, StartResponse, StatusResponse};
use super::AppState;
use crate::orchestrator::TurnError;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Liveness
        .route("/", get(root))
        .route("/version", get(get_version))
        // Conversation lifecycle
        .route("/start", get(start_conversation))
        .route("/chat", post(chat))
        .with_state(state)
}

async fn root() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "API online",
    })
}

async fn get_version() -> &'static str {
    concat!("assistant-relay ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Conversations
// ============================================================

async fn start_conversation(
    State(state): State<AppState>,
) -> Result<Json<StartResponse>, AppError> {
    let thread = state.sessions.start_session().await?;
    Ok(Json(StartResponse {
        thread_id: thread.id,
    }))
}

async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(req) = payload.map_err(|e| AppError::Unprocessable(e.body_text()))?;
    tracing::debug!(
        thread_id = req.thread_id.as_deref().unwrap_or_default(),
        message_len = req.message.as_deref().map_or(0, str::len),
        "Chat request received"
    );

    let response = state
        .orchestrator
        .send_turn(
            req.thread_id.as_deref().unwrap_or_default(),
            req.message.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok(Json(ChatResponse { response }))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    Unprocessable(String),
    Internal(String),
    GatewayTimeout(String),
}

impl From<TurnError> for AppError {
    fn from(err: TurnError) -> Self {
        let message = err.to_string();
        match err {
            TurnError::InvalidRequest(_) => AppError::BadRequest(message),
            TurnError::RunTimeout { .. } => {
                tracing::warn!(error = %message, "Chat turn timed out");
                AppError::GatewayTimeout(message)
            }
            TurnError::UpstreamUnavailable(_)
            | TurnError::RunFailed { .. }
            | TurnError::NoReplyFound { .. } => {
                tracing::error!(error = %message, "Chat turn failed");
                AppError::Internal(message)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::GatewayTimeout(msg) => (StatusCode::GATEWAY_TIMEOUT, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
