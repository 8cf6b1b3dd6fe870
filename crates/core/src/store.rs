//! The progress store seam.
//!
//! Implementations live in `rendergate-store`. Every mutation is atomic
//! per job id and monotonic by [`JobState::rank`]; readers never observe
//! a partially written record. Keys are independent, so no cross-job
//! coordination is required of implementations.

use async_trait::async_trait;

use crate::progress::JobState;
use crate::record::{JobRecord, ResultRef};
use crate::types::JobId;

/// Errors from progress store implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Job ids are never reused; creating over an existing id is a bug.
    #[error("job {0} already exists")]
    AlreadyExists(JobId),

    #[error("job {0} not found")]
    NotFound(JobId),

    /// Attempt to rebind an already-bound correlation id.
    #[error("job {job_id} is already bound to provider job {existing}")]
    CorrelationBound { job_id: JobId, existing: String },

    /// Attempt to attach a result to a job that already failed.
    #[error("job {job_id} is terminal ({state:?}) and cannot take a result")]
    Terminal { job_id: JobId, state: JobState },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt job record: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Durable, per-key-atomic persistence for job records.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Create a fresh record in [`JobState::Submitted`].
    async fn create(&self, job_id: JobId) -> Result<(), StoreError>;

    /// Current record for `job_id`, or `None` for an unknown job.
    ///
    /// "Unknown" is a distinct outcome from "failed"; the legacy wire
    /// contract conflates the two as `-1`, but that flattening happens
    /// at the HTTP boundary, not here.
    async fn get(&self, job_id: JobId) -> Result<Option<JobRecord>, StoreError>;

    /// Atomically bind the write-once correlation id and advance to
    /// [`JobState::Accepted`].
    ///
    /// Binding the same id again is a no-op; binding a different id
    /// fails with [`StoreError::CorrelationBound`].
    async fn mark_accepted(&self, job_id: JobId, provider_job_id: &str) -> Result<(), StoreError>;

    /// Monotonic compare-and-set: `state` is persisted only if it
    /// outranks the stored state. Returns the effective state either
    /// way, so duplicate or out-of-order provider responses can never
    /// move progress backward.
    ///
    /// `Succeeded` must go through [`complete`](Self::complete) instead,
    /// so a success state can never exist without its result.
    async fn advance(&self, job_id: JobId, state: JobState) -> Result<JobState, StoreError>;

    /// Atomically set [`JobState::Succeeded`] and the write-once result.
    ///
    /// First writer wins: if a result is already stored, the stored
    /// reference is returned and the new one is discarded (the provider
    /// returns the same output for the same correlation id, so both
    /// writers resolved the same artifact).
    async fn complete(&self, job_id: JobId, result: ResultRef) -> Result<ResultRef, StoreError>;
}
