//! HTTP API for the assistant relay

mod handlers;
mod types;

pub use handlers::create_router;

use crate::assistant::AssistantService;
use crate::orchestrator::{PollPolicy, RunOrchestrator};
use crate::session::SessionManager;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionManager>,
    pub orchestrator: Arc<RunOrchestrator>,
}

impl AppState {
    /// Both components share the one service handle
    pub fn new(
        assistant: Arc<dyn AssistantService>,
        assistant_id: impl Into<String>,
        poll: PollPolicy,
    ) -> Self {
        Self {
            sessions: Arc::new(SessionManager::new(assistant.clone())),
            orchestrator: Arc::new(RunOrchestrator::new(assistant, assistant_id, poll)),
        }
    }
}
