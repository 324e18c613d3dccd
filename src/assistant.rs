//! Remote assistant service abstraction
//!
//! Threads, messages and runs live on the remote service; this module only
//! describes how to reach them.

mod error;
mod openai;
mod types;

#[cfg(test)]
pub mod testing;

pub use error::{AssistantError, AssistantErrorKind};
pub use openai::{OpenAiAssistants, DEFAULT_BASE_URL};
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

/// Operations the relay needs from a hosted, stateful assistant
#[async_trait]
pub trait AssistantService: Send + Sync {
    /// Create an empty conversation thread
    async fn create_thread(&self) -> Result<Thread, AssistantError>;

    /// Append a message to a thread, returning the new message id
    async fn append_message(
        &self,
        thread_id: &str,
        role: Role,
        text: &str,
    ) -> Result<String, AssistantError>;

    /// Start a run of `assistant_id` over the thread's current contents
    async fn start_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run, AssistantError>;

    /// Re-read a run's current state
    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AssistantError>;

    /// Thread history, newest entry first
    async fn list_transcript(&self, thread_id: &str)
        -> Result<Vec<TranscriptEntry>, AssistantError>;
}

/// Logging wrapper for assistant services
pub struct LoggingAssistant {
    inner: Arc<dyn AssistantService>,
}

impl LoggingAssistant {
    pub fn new(inner: Arc<dyn AssistantService>) -> Self {
        Self { inner }
    }
}

fn log_call<T>(
    operation: &str,
    thread_id: &str,
    started: Instant,
    result: &Result<T, AssistantError>,
) {
    let duration = started.elapsed();
    match result {
        Ok(_) => {
            tracing::debug!(
                operation,
                thread_id,
                duration_ms = %duration.as_millis(),
                "Assistant call completed"
            );
        }
        Err(e) => {
            tracing::error!(
                operation,
                thread_id,
                duration_ms = %duration.as_millis(),
                error = %e.message,
                kind = ?e.kind,
                retryable = e.kind.is_retryable(),
                "Assistant call failed"
            );
        }
    }
}

#[async_trait]
impl AssistantService for LoggingAssistant {
    async fn create_thread(&self) -> Result<Thread, AssistantError> {
        let start = Instant::now();
        let result = self.inner.create_thread().await;
        let thread_id = result.as_ref().map_or("", |t| t.id.as_str());
        log_call("create_thread", thread_id, start, &result);
        result
    }

    async fn append_message(
        &self,
        thread_id: &str,
        role: Role,
        text: &str,
    ) -> Result<String, AssistantError> {
        let start = Instant::now();
        let result = self.inner.append_message(thread_id, role, text).await;
        log_call("append_message", thread_id, start, &result);
        result
    }

    async fn start_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run, AssistantError> {
        let start = Instant::now();
        let result = self.inner.start_run(thread_id, assistant_id).await;
        log_call("start_run", thread_id, start, &result);
        result
    }

    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AssistantError> {
        let start = Instant::now();
        let result = self.inner.get_run(thread_id, run_id).await;
        log_call("get_run", thread_id, start, &result);
        result
    }

    async fn list_transcript(
        &self,
        thread_id: &str,
    ) -> Result<Vec<TranscriptEntry>, AssistantError> {
        let start = Instant::now();
        let result = self.inner.list_transcript(thread_id).await;
        log_call("list_transcript", thread_id, start, &result);
        result
    }
}
