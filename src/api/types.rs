//! API request and response types

use serde::{Deserialize, Serialize};

/// Request to post a user message to a thread.
///
/// Both fields are optional on the wire so a missing field is reported the
/// same way as an empty one.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response for a new conversation
#[derive(Debug, Serialize)]
pub struct StartResponse {
    pub thread_id: String,
}

/// Response carrying the assistant's reply
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Liveness probe response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            detail: message.into(),
        }
    }
}
