//! In-memory progress store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use rendergate_core::record::{JobRecord, ResultRef};
use rendergate_core::store::{ProgressStore, StoreError};
use rendergate_core::{JobId, JobState};

/// `HashMap` behind an async `RwLock`. Per-key atomicity falls out of
/// holding the write lock across each read-modify-write.
#[derive(Default)]
pub struct MemoryStore {
    jobs: RwLock<HashMap<JobId, JobRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressStore for MemoryStore {
    async fn create(&self, job_id: JobId) -> Result<(), StoreError> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job_id) {
            return Err(StoreError::AlreadyExists(job_id));
        }
        jobs.insert(job_id, JobRecord::new());
        Ok(())
    }

    async fn get(&self, job_id: JobId) -> Result<Option<JobRecord>, StoreError> {
        Ok(self.jobs.read().await.get(&job_id).cloned())
    }

    async fn mark_accepted(&self, job_id: JobId, provider_job_id: &str) -> Result<(), StoreError> {
        let mut jobs = self.jobs.write().await;
        let record = jobs.get_mut(&job_id).ok_or(StoreError::NotFound(job_id))?;
        apply_accepted(job_id, record, provider_job_id)
    }

    async fn advance(&self, job_id: JobId, state: JobState) -> Result<JobState, StoreError> {
        let mut jobs = self.jobs.write().await;
        let record = jobs.get_mut(&job_id).ok_or(StoreError::NotFound(job_id))?;
        Ok(apply_advance(record, state))
    }

    async fn complete(&self, job_id: JobId, result: ResultRef) -> Result<ResultRef, StoreError> {
        let mut jobs = self.jobs.write().await;
        let record = jobs.get_mut(&job_id).ok_or(StoreError::NotFound(job_id))?;
        apply_complete(job_id, record, result)
    }
}

// Shared transition logic, reused by `FileStore` on its loaded records.

pub(crate) fn apply_accepted(
    job_id: JobId,
    record: &mut JobRecord,
    provider_job_id: &str,
) -> Result<(), StoreError> {
    if let Some(existing) = record.provider_job_id.as_deref() {
        if existing != provider_job_id {
            return Err(StoreError::CorrelationBound {
                job_id,
                existing: existing.to_string(),
            });
        }
        // Same id again: idempotent, and the job is already accepted.
        return Ok(());
    }
    record.provider_job_id = Some(provider_job_id.to_string());
    apply_advance(record, JobState::Accepted);
    Ok(())
}

pub(crate) fn apply_advance(record: &mut JobRecord, state: JobState) -> JobState {
    debug_assert!(
        state != JobState::Succeeded,
        "success must go through complete() so it carries a result",
    );
    if record.state.can_advance_to(state) {
        record.state = state;
        record.updated_at = chrono::Utc::now();
    }
    record.state
}

pub(crate) fn apply_complete(
    job_id: JobId,
    record: &mut JobRecord,
    result: ResultRef,
) -> Result<ResultRef, StoreError> {
    if let Some(existing) = &record.result {
        // First writer won; the duplicate resolution is a no-op.
        return Ok(existing.clone());
    }
    if record.state == JobState::Failed {
        return Err(StoreError::Terminal {
            job_id,
            state: record.state,
        });
    }
    record.state = JobState::Succeeded;
    record.result = Some(result.clone());
    record.updated_at = chrono::Utc::now();
    Ok(result)
}
