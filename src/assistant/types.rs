//! Common types for assistant threads and runs

use serde::Deserialize;
use std::fmt;

/// A server-side conversation thread
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Thread {
    pub id: String,
}

/// Author of a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
    #[serde(other)]
    Other,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Other => "other",
        }
    }
}

/// Status of a run as reported by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
    #[serde(other)]
    Unknown,
}

/// Coarse outcome of a run status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Still computing; keep polling
    Pending,
    /// Reply is ready in the transcript
    Succeeded,
    /// Will never produce a reply
    Failed,
}

impl RunStatus {
    /// `requires_action` counts as failed: tool outputs are never submitted
    /// from here, so the run cannot progress on its own.
    pub fn phase(self) -> RunPhase {
        match self {
            RunStatus::Queued
            | RunStatus::InProgress
            | RunStatus::Cancelling
            | RunStatus::Unknown => RunPhase::Pending,
            RunStatus::Completed => RunPhase::Succeeded,
            RunStatus::Cancelled
            | RunStatus::Failed
            | RunStatus::Incomplete
            | RunStatus::Expired
            | RunStatus::RequiresAction => RunPhase::Failed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Failed => "failed",
            RunStatus::Completed => "completed",
            RunStatus::Incomplete => "incomplete",
            RunStatus::Expired => "expired",
            RunStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error detail attached to a failed run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunError {
    #[allow(dead_code)] // Part of API response, message is what gets surfaced
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// One assistant computation over a thread
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Run {
    pub id: String,
    #[allow(dead_code)] // Part of API response
    pub thread_id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub last_error: Option<RunError>,
}

/// One message in a thread's history.
///
/// Content blocks are kept as raw JSON; interpreting them is left to reply
/// extraction so a single odd block cannot poison the whole transcript.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TranscriptEntry {
    pub id: String,
    pub role: Role,
    #[serde(default)]
    pub run_id: Option<String>,
    #[serde(default)]
    pub content: Vec<serde_json::Value>,
}

#[cfg(test)]
impl TranscriptEntry {
    /// Entry with a single text block
    pub fn text(id: impl Into<String>, role: Role, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role,
            run_id: None,
            content: vec![serde_json::json!({
                "type": "text",
                "text": { "value": text.into(), "annotations": [] }
            })],
        }
    }
}
