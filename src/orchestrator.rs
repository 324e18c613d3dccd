//! Run orchestration
//!
//! One chat turn is: submit the user message, start a run, poll it to a
//! terminal status under a fixed budget, then read the reply back out of
//! the transcript. Each step runs strictly after the previous one; nothing
//! here is retried, since a repeated submission would duplicate the user's
//! message upstream.

mod error;
mod extract;

#[cfg(test)]
mod proptests;

pub use error::TurnError;
pub use extract::extract_reply;

use crate::assistant::{AssistantService, Role, Run, RunPhase, RunStatus};
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;

/// How long to wait for a run to finish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Pause before each status check
    pub interval: Duration,
    /// Maximum number of status checks
    pub budget: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            budget: 30,
        }
    }
}

/// Drives chat turns against a configured assistant
pub struct RunOrchestrator {
    assistant: Arc<dyn AssistantService>,
    assistant_id: String,
    poll: PollPolicy,
}

impl RunOrchestrator {
    pub fn new(
        assistant: Arc<dyn AssistantService>,
        assistant_id: impl Into<String>,
        poll: PollPolicy,
    ) -> Self {
        Self {
            assistant,
            assistant_id: assistant_id.into(),
            poll,
        }
    }

    /// Post `message` to the thread and wait for the assistant's reply.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` when either argument is blank (no remote call is
    /// made), `UpstreamUnavailable` when a service call fails, `RunFailed`
    /// or `RunTimeout` when the run does not complete, and `NoReplyFound`
    /// when the transcript holds no readable assistant text.
    pub async fn send_turn(&self, thread_id: &str, message: &str) -> Result<String, TurnError> {
        if thread_id.trim().is_empty() {
            return Err(TurnError::InvalidRequest(
                "thread_id must not be empty".to_string(),
            ));
        }
        if message.trim().is_empty() {
            return Err(TurnError::InvalidRequest(
                "message must not be empty".to_string(),
            ));
        }

        let turn_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!("turn", %turn_id, thread_id);
        self.run_turn(thread_id, message).instrument(span).await
    }

    async fn run_turn(&self, thread_id: &str, message: &str) -> Result<String, TurnError> {
        let message_id = self
            .assistant
            .append_message(thread_id, Role::User, message)
            .await?;
        tracing::debug!(%message_id, "User message submitted");

        let run = self
            .assistant
            .start_run(thread_id, &self.assistant_id)
            .await?;
        tracing::info!(run_id = %run.id, status = %run.status, "Run started");

        self.wait_for_run(thread_id, run).await?;

        let transcript = self.assistant.list_transcript(thread_id).await?;
        match extract_reply(&transcript) {
            Some(reply) => {
                tracing::info!(reply_len = reply.len(), "Reply extracted");
                Ok(reply)
            }
            None => {
                tracing::warn!(entries = transcript.len(), "No assistant reply in transcript");
                Err(TurnError::NoReplyFound {
                    thread_id: thread_id.to_string(),
                })
            }
        }
    }

    /// Poll until the run leaves the pending phase or the budget runs out.
    /// The status returned by `start_run` is checked first; after that at
    /// most `budget` checks are made, each preceded by a non-blocking sleep.
    async fn wait_for_run(&self, thread_id: &str, run: Run) -> Result<(), TurnError> {
        let run_id = run.id;
        let mut status = run.status;
        let mut last_error = run.last_error;
        let mut polls = 0;

        loop {
            match status.phase() {
                RunPhase::Succeeded => {
                    tracing::info!(%run_id, polls, "Run completed");
                    return Ok(());
                }
                RunPhase::Failed => {
                    let reason = last_error.map(|e| e.message);
                    tracing::warn!(%run_id, %status, ?reason, "Run did not complete");
                    return Err(TurnError::RunFailed {
                        run_id,
                        status,
                        reason,
                    });
                }
                RunPhase::Pending => {}
            }

            if polls >= self.poll.budget {
                tracing::warn!(%run_id, %status, polls, "Run poll budget exhausted");
                return Err(TurnError::RunTimeout {
                    run_id,
                    status,
                    polls,
                });
            }

            tokio::time::sleep(self.poll.interval).await;
            polls += 1;

            let run = self.assistant.get_run(thread_id, &run_id).await?;
            if run.status == RunStatus::Unknown {
                tracing::warn!(%run_id, "Unrecognized run status, still waiting");
            } else {
                tracing::debug!(%run_id, status = %run.status, polls, "Run status");
            }
            status = run.status;
            last_error = run.last_error;
        }
    }
}
