//! The remote inference provider seam.
//!
//! The provider is an opaque job-execution service reachable over a
//! submit/status protocol. This crate only fixes the contract; the
//! concrete RunPod client lives in `rendergate-runpod`.

use async_trait::async_trait;

/// Work payload handed to the provider at submission.
///
/// The two variants are the two ingestion strategies: inline-encoded
/// bytes versus a remote location the provider fetches itself. Which
/// one a job uses is decided at the HTTP boundary; the lifecycle logic
/// is identical for both.
#[derive(Debug, Clone)]
pub enum SubmitInput {
    /// Base64-encoded video payload sent inline.
    VideoBase64(String),
    /// URL the provider downloads the video from.
    VideoUrl(String),
}

/// Provider-reported status for a submitted job.
#[derive(Debug, Clone, PartialEq)]
pub enum PollStatus {
    /// Queued or running. All intermediate provider detail collapses
    /// into this one value.
    InProgress,
    /// Finished; `output` is the raw result payload, to be interpreted
    /// by the result resolver.
    Succeeded { output: serde_json::Value },
    Failed,
}

/// Errors from the provider protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Provider answered with a non-success HTTP status. Transient from
    /// the poll path's point of view: it means "no new information",
    /// never "the job failed".
    #[error("provider unavailable ({status}): {body}")]
    Unavailable { status: u16, body: String },

    /// The request never produced an HTTP response (network, DNS, TLS,
    /// timeout). Transient, same as [`Unavailable`](Self::Unavailable).
    #[error("provider request failed: {0}")]
    Transport(String),

    /// Provider answered success but the response is not usable (e.g.
    /// the submit response carries no correlation id).
    #[error("provider protocol error: {0}")]
    Protocol(String),
}

/// Stateless request/response wrapper around the provider protocol.
///
/// No retries and no local state; the lifecycle controller decides what
/// every outcome means for the job.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Submit a work payload. Returns the provider's correlation id.
    async fn submit(&self, input: &SubmitInput) -> Result<String, ProviderError>;

    /// Query the status of a previously submitted job.
    async fn poll(&self, provider_job_id: &str) -> Result<PollStatus, ProviderError>;
}
