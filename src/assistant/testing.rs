//! Mock assistant service for testing
//!
//! Scripts run statuses and transcripts, injects failures, and records every
//! call so tests can assert on the remote interaction.

use super::types::{Role, Run, RunError, RunStatus, Thread, TranscriptEntry};
use super::{AssistantError, AssistantErrorKind, AssistantService};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// A message appended through the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendedMessage {
    pub thread_id: String,
    pub role: Role,
    pub text: String,
}

/// Mock assistant service with scripted behavior
pub struct MockAssistant {
    next_id: AtomicU64,
    initial_status: Mutex<RunStatus>,
    /// Statuses returned by successive `get_run` calls
    statuses: Mutex<VecDeque<RunStatus>>,
    /// Returned once `statuses` is exhausted
    idle_status: Mutex<RunStatus>,
    run_error: Mutex<Option<RunError>>,
    /// While set and false, `get_run` reports `in_progress` without consuming the script
    gate: Mutex<Option<Arc<AtomicBool>>>,
    transcript: Mutex<Vec<TranscriptEntry>>,
    failures: Mutex<HashMap<&'static str, (AssistantErrorKind, String)>>,
    calls: Mutex<Vec<&'static str>>,
    appended: Mutex<Vec<AppendedMessage>>,
}

impl MockAssistant {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            initial_status: Mutex::new(RunStatus::Queued),
            statuses: Mutex::new(VecDeque::new()),
            idle_status: Mutex::new(RunStatus::InProgress),
            run_error: Mutex::new(None),
            gate: Mutex::new(None),
            transcript: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            appended: Mutex::new(Vec::new()),
        }
    }

    /// Status reported by `start_run`
    pub fn set_initial_status(&self, status: RunStatus) {
        *self.initial_status.lock().unwrap() = status;
    }

    /// Queue statuses for successive polls
    pub fn queue_statuses(&self, statuses: &[RunStatus]) {
        self.statuses.lock().unwrap().extend(statuses.iter().copied());
    }

    pub fn set_idle_status(&self, status: RunStatus) {
        *self.idle_status.lock().unwrap() = status;
    }

    pub fn set_run_error(&self, message: impl Into<String>) {
        *self.run_error.lock().unwrap() = Some(RunError {
            code: Some("server_error".to_string()),
            message: message.into(),
        });
    }

    /// Hold runs in progress until the returned flag is set
    pub fn gate(&self) -> Arc<AtomicBool> {
        let flag = Arc::new(AtomicBool::new(false));
        *self.gate.lock().unwrap() = Some(flag.clone());
        flag
    }

    /// Append to the transcript; entries are listed in insertion order
    pub fn push_transcript(&self, entry: TranscriptEntry) {
        self.transcript.lock().unwrap().push(entry);
    }

    /// Make every call to `operation` fail with the given error
    pub fn fail_on(&self, operation: &'static str, error: AssistantError) {
        self.failures
            .lock()
            .unwrap()
            .insert(operation, (error.kind, error.message));
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| **c == operation)
            .count()
    }

    pub fn appended(&self) -> Vec<AppendedMessage> {
        self.appended.lock().unwrap().clone()
    }

    fn record(&self, operation: &'static str) -> Result<(), AssistantError> {
        self.calls.lock().unwrap().push(operation);
        match self.failures.lock().unwrap().get(operation) {
            Some((kind, message)) => Err(AssistantError::new(*kind, message.clone())),
            None => Ok(()),
        }
    }

    fn next_id(&self, prefix: &str) -> String {
        format!("{prefix}_{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn run(&self, id: String, thread_id: &str, status: RunStatus) -> Run {
        let last_error = if status == RunStatus::Failed {
            self.run_error.lock().unwrap().clone()
        } else {
            None
        };
        Run {
            id,
            thread_id: thread_id.to_string(),
            status,
            last_error,
        }
    }
}

impl Default for MockAssistant {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssistantService for MockAssistant {
    async fn create_thread(&self) -> Result<Thread, AssistantError> {
        self.record("create_thread")?;
        Ok(Thread {
            id: self.next_id("thread"),
        })
    }

    async fn append_message(
        &self,
        thread_id: &str,
        role: Role,
        text: &str,
    ) -> Result<String, AssistantError> {
        self.record("append_message")?;
        self.appended.lock().unwrap().push(AppendedMessage {
            thread_id: thread_id.to_string(),
            role,
            text: text.to_string(),
        });
        Ok(self.next_id("msg"))
    }

    async fn start_run(&self, thread_id: &str, _assistant_id: &str) -> Result<Run, AssistantError> {
        self.record("start_run")?;
        let status = *self.initial_status.lock().unwrap();
        Ok(self.run(self.next_id("run"), thread_id, status))
    }

    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AssistantError> {
        self.record("get_run")?;
        let held = self
            .gate
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|flag| !flag.load(Ordering::SeqCst));
        let status = if held {
            RunStatus::InProgress
        } else {
            let next = self.statuses.lock().unwrap().pop_front();
            next.unwrap_or(*self.idle_status.lock().unwrap())
        };
        Ok(self.run(run_id.to_string(), thread_id, status))
    }

    async fn list_transcript(
        &self,
        _thread_id: &str,
    ) -> Result<Vec<TranscriptEntry>, AssistantError> {
        self.record("list_transcript")?;
        Ok(self.transcript.lock().unwrap().clone())
    }
}
