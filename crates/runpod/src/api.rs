//! REST client for the RunPod serverless endpoints.
//!
//! Wire contract:
//! - `POST {base}/v2/{endpoint_id}/run` with `{"input": {...}}` queues a
//!   job and answers `{"id": "...", "status": "IN_QUEUE"}`.
//! - `GET {base}/v2/{endpoint_id}/status/{id}` answers
//!   `{"status": "...", "output": {...}?}`.
//!
//! Both requests carry a `Bearer` API key. No retries here; the
//! lifecycle controller decides what each outcome means.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use rendergate_core::provider::{PollStatus, Provider, ProviderError, SubmitInput};

/// Submission can carry a whole encoded video, so it gets more headroom
/// than the lightweight status query.
const SUBMIT_TIMEOUT: Duration = Duration::from_secs(60);
const STATUS_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for one RunPod serverless endpoint.
pub struct RunPodApi {
    client: reqwest::Client,
    api_base: String,
    endpoint_id: String,
    api_key: String,
}

/// Response returned by `POST /run` after queuing a job.
#[derive(Debug, Deserialize)]
struct RunResponse {
    /// Server-assigned correlation id. Optional in the schema so its
    /// absence maps to a protocol error instead of a decode error.
    id: Option<String>,
}

/// Response returned by `GET /status/{id}`.
#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: String,
    #[serde(default)]
    output: Option<serde_json::Value>,
}

impl RunPodApi {
    /// Create a client for one endpoint.
    ///
    /// * `api_base`    - e.g. `https://api.runpod.ai` (no trailing slash).
    /// * `endpoint_id` - the serverless endpoint to target.
    pub fn new(api_base: String, endpoint_id: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base,
            endpoint_id,
            api_key,
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        api_base: String,
        endpoint_id: String,
        api_key: String,
    ) -> Self {
        Self {
            client,
            api_base,
            endpoint_id,
            api_key,
        }
    }

    fn run_url(&self) -> String {
        format!("{}/v2/{}/run", self.api_base, self.endpoint_id)
    }

    fn status_url(&self, provider_job_id: &str) -> String {
        format!(
            "{}/v2/{}/status/{}",
            self.api_base, self.endpoint_id, provider_job_id
        )
    }

    /// Map a non-success response to [`ProviderError::Unavailable`],
    /// keeping the body text for the caller's error detail.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ProviderError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ProviderError::Unavailable {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl Provider for RunPodApi {
    async fn submit(&self, input: &SubmitInput) -> Result<String, ProviderError> {
        let body = serde_json::json!({ "input": input_payload(input) });

        let response = self
            .client
            .post(self.run_url())
            .bearer_auth(&self.api_key)
            .timeout(SUBMIT_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        let response = Self::ensure_success(response).await?;

        let parsed: RunResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Protocol(format!("undecodable submit response: {e}")))?;
        parsed
            .id
            .ok_or_else(|| ProviderError::Protocol("submit response missing `id` field".into()))
    }

    async fn poll(&self, provider_job_id: &str) -> Result<PollStatus, ProviderError> {
        let response = self
            .client
            .get(self.status_url(provider_job_id))
            .bearer_auth(&self.api_key)
            .timeout(STATUS_TIMEOUT)
            .send()
            .await
            .map_err(transport)?;
        let response = Self::ensure_success(response).await?;

        let parsed: StatusResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Protocol(format!("undecodable status response: {e}")))?;
        tracing::debug!(
            provider_job_id = %provider_job_id,
            status = %parsed.status,
            "RunPod status",
        );
        Ok(map_status(&parsed.status, parsed.output))
    }
}

fn transport(e: reqwest::Error) -> ProviderError {
    ProviderError::Transport(e.to_string())
}

/// JSON `input` object for the two ingestion strategies.
fn input_payload(input: &SubmitInput) -> serde_json::Value {
    match input {
        SubmitInput::VideoBase64(encoded) => serde_json::json!({ "video_base64": encoded }),
        SubmitInput::VideoUrl(url) => serde_json::json!({ "video_url": url }),
    }
}

/// RunPod status strings collapse to the three-valued poll status.
///
/// Anything that is not an explicit terminal status (`IN_QUEUE`,
/// `IN_PROGRESS`, statuses added by future RunPod versions) counts as
/// in-progress.
fn map_status(status: &str, output: Option<serde_json::Value>) -> PollStatus {
    match status {
        "COMPLETED" => PollStatus::Succeeded {
            output: output.unwrap_or(serde_json::Value::Null),
        },
        "FAILED" => PollStatus::Failed,
        _ => PollStatus::InProgress,
    }
}
