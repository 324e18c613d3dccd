//! Turn failure classification

use crate::assistant::{AssistantError, RunStatus};
use thiserror::Error;

/// Why a chat turn (or session start) produced no reply
#[derive(Debug, Error)]
pub enum TurnError {
    /// Rejected before any remote call
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The assistant service could not be reached or refused a call
    #[error("assistant service unavailable: {0}")]
    UpstreamUnavailable(#[from] AssistantError),

    /// The run reached a terminal state other than `completed`
    #[error("run {run_id} ended with status {status}{}", reason_suffix(.reason.as_deref()))]
    RunFailed {
        run_id: String,
        status: RunStatus,
        reason: Option<String>,
    },

    /// The poll budget ran out; the run is left running upstream
    #[error("run {run_id} still {status} after {polls} status checks")]
    RunTimeout {
        run_id: String,
        status: RunStatus,
        polls: u32,
    },

    /// The transcript holds no readable assistant reply
    #[error("no assistant reply found in thread {thread_id}")]
    NoReplyFound { thread_id: String },
}

fn reason_suffix(reason: Option<&str>) -> String {
    reason.map(|r| format!(": {r}")).unwrap_or_default()
}
