//! `OpenAI` Assistants (v2) implementation

use super::types::{Role, Run, Thread, TranscriptEntry};
use super::{AssistantError, AssistantService};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Newest-first page size when reading a transcript. The reply to the
/// current turn is always near the top.
const TRANSCRIPT_PAGE_SIZE: u32 = 20;

/// Client for the hosted `OpenAI` Assistants API
pub struct OpenAiAssistants {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl OpenAiAssistants {
    pub fn new(
        api_key: String,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, AssistantError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AssistantError::invalid_request(format!("Invalid base URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(AssistantError::invalid_request(format!(
                "Base URL cannot carry a path: {base_url}"
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AssistantError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url,
        })
    }

    /// Build an endpoint URL; every segment is percent-encoded, so a thread
    /// id can never escape its path position.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, AssistantError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| AssistantError::invalid_request("Base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.api_key)
            .header("OpenAI-Beta", "assistants=v2")
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, AssistantError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                AssistantError::network(format!("Request timeout: {e}"))
            } else if e.is_connect() {
                AssistantError::network(format!("Connection failed: {e}"))
            } else {
                AssistantError::unknown(format!("Request failed: {e}"))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AssistantError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            if let Ok(error_resp) = serde_json::from_str::<ApiErrorResponse>(&body) {
                return Err(AssistantError::from_status(
                    status.as_u16(),
                    &error_resp.error.message,
                ));
            }
            return Err(AssistantError::from_status(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            AssistantError::unknown(format!("Failed to parse response: {e} - body: {body}"))
        })
    }
}

#[async_trait]
impl AssistantService for OpenAiAssistants {
    async fn create_thread(&self) -> Result<Thread, AssistantError> {
        let url = self.endpoint(&["threads"])?;
        self.send(self.request(Method::POST, url).json(&serde_json::json!({})))
            .await
    }

    async fn append_message(
        &self,
        thread_id: &str,
        role: Role,
        text: &str,
    ) -> Result<String, AssistantError> {
        let url = self.endpoint(&["threads", thread_id, "messages"])?;
        let body = CreateMessageRequest {
            role: role.as_str(),
            content: text,
        };
        let created: CreatedObject = self
            .send(self.request(Method::POST, url).json(&body))
            .await?;
        Ok(created.id)
    }

    async fn start_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run, AssistantError> {
        let url = self.endpoint(&["threads", thread_id, "runs"])?;
        let body = CreateRunRequest { assistant_id };
        self.send(self.request(Method::POST, url).json(&body)).await
    }

    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AssistantError> {
        let url = self.endpoint(&["threads", thread_id, "runs", run_id])?;
        self.send(self.request(Method::GET, url)).await
    }

    async fn list_transcript(
        &self,
        thread_id: &str,
    ) -> Result<Vec<TranscriptEntry>, AssistantError> {
        let mut url = self.endpoint(&["threads", thread_id, "messages"])?;
        url.query_pairs_mut()
            .append_pair("order", "desc")
            .append_pair("limit", &TRANSCRIPT_PAGE_SIZE.to_string());

        let page: ListResponse = self.send(self.request(Method::GET, url)).await?;
        Ok(decode_transcript(page.data))
    }
}

/// Decode each listed message on its own; undecodable ones are dropped.
fn decode_transcript(data: Vec<serde_json::Value>) -> Vec<TranscriptEntry> {
    data.into_iter()
        .filter_map(|raw| match serde_json::from_value::<TranscriptEntry>(raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping undecodable transcript entry");
                None
            }
        })
        .collect()
}

// Assistants API wire types

#[derive(Debug, Serialize)]
struct CreateMessageRequest<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateRunRequest<'a> {
    assistant_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreatedObject {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    data: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}
