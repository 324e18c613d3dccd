//! Conversation sessions
//!
//! A session is just a remote thread; nothing is kept locally.

use crate::assistant::{AssistantService, Thread};
use crate::orchestrator::TurnError;
use std::sync::Arc;

pub struct SessionManager {
    assistant: Arc<dyn AssistantService>,
}

impl SessionManager {
    pub fn new(assistant: Arc<dyn AssistantService>) -> Self {
        Self { assistant }
    }

    /// Open a new conversation thread.
    ///
    /// # Errors
    ///
    /// `UpstreamUnavailable` when the service cannot create the thread.
    pub async fn start_session(&self) -> Result<Thread, TurnError> {
        tracing::info!("Starting a new conversation");
        let thread = self.assistant.create_thread().await?;
        tracing::info!(thread_id = %thread.id, "Conversation thread created");
        Ok(thread)
    }
}
