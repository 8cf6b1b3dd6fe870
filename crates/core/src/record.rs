//! The persisted per-job record.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::progress::JobState;
use crate::types::Timestamp;

/// Where a finished job's artifact lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ResultRef {
    /// Decoded artifact written to local storage; served as a stream.
    File(PathBuf),
    /// Provider-hosted artifact; served as a redirect.
    Url(String),
}

/// Everything the store persists for one job.
///
/// Invariants (enforced by [`ProgressStore`](crate::store::ProgressStore)
/// implementations):
/// - `provider_job_id` is write-once.
/// - `result` is present iff `state` is [`JobState::Succeeded`], and is
///   itself write-once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub state: JobState,
    /// Correlation id assigned by the provider on submission.
    pub provider_job_id: Option<String>,
    pub result: Option<ResultRef>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl JobRecord {
    /// Fresh record in the initial [`JobState::Submitted`] state.
    pub fn new() -> Self {
        let now = chrono::Utc::now();
        Self {
            state: JobState::Submitted,
            provider_job_id: None,
            result: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Default for JobRecord {
    fn default() -> Self {
        Self::new()
    }
}
