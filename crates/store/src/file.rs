//! File-backed progress store.
//!
//! One pretty-printed JSON file per job under the state directory.
//! Writes land in a temp file and are `rename`d into place, which is
//! atomic on a single filesystem, so a concurrent reader sees either
//! the old record or the new one, never a torn write. A per-key async
//! mutex serializes read-modify-write cycles for the same job; distinct
//! jobs never contend.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use rendergate_core::record::{JobRecord, ResultRef};
use rendergate_core::store::{ProgressStore, StoreError};
use rendergate_core::{JobId, JobState};

use crate::memory::{apply_accepted, apply_advance, apply_complete};

/// Durable store rooted at a state directory. Survives process restart.
pub struct FileStore {
    dir: PathBuf,
    locks: Mutex<HashMap<JobId, Arc<Mutex<()>>>>,
}

impl FileStore {
    /// Open (and create if needed) the state directory.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        tracing::debug!(dir = %dir.display(), "Progress store opened");
        Ok(Self {
            dir,
            locks: Mutex::new(HashMap::new()),
        })
    }

    fn record_path(&self, job_id: JobId) -> PathBuf {
        self.dir.join(format!("{job_id}.json"))
    }

    /// Per-job mutex, created on first touch. Entries are tiny and job
    /// ids are never reused, so the map is left to grow with the job
    /// population rather than risking a lock being dropped mid-use.
    async fn key_lock(&self, job_id: JobId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(job_id).or_default().clone()
    }

    async fn load(&self, job_id: JobId) -> Result<Option<JobRecord>, StoreError> {
        match tokio::fs::read(self.record_path(job_id)).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn persist(&self, job_id: JobId, record: &JobRecord) -> Result<(), StoreError> {
        let tmp = self.dir.join(format!("{job_id}.json.tmp"));
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(record)?).await?;
        tokio::fs::rename(&tmp, self.record_path(job_id)).await?;
        Ok(())
    }
}

#[async_trait]
impl ProgressStore for FileStore {
    async fn create(&self, job_id: JobId) -> Result<(), StoreError> {
        let lock = self.key_lock(job_id).await;
        let _guard = lock.lock().await;

        if self.load(job_id).await?.is_some() {
            return Err(StoreError::AlreadyExists(job_id));
        }
        self.persist(job_id, &JobRecord::new()).await
    }

    async fn get(&self, job_id: JobId) -> Result<Option<JobRecord>, StoreError> {
        // Rename-based commits make lock-free reads safe.
        self.load(job_id).await
    }

    async fn mark_accepted(&self, job_id: JobId, provider_job_id: &str) -> Result<(), StoreError> {
        let lock = self.key_lock(job_id).await;
        let _guard = lock.lock().await;

        let mut record = self.load(job_id).await?.ok_or(StoreError::NotFound(job_id))?;
        apply_accepted(job_id, &mut record, provider_job_id)?;
        self.persist(job_id, &record).await
    }

    async fn advance(&self, job_id: JobId, state: JobState) -> Result<JobState, StoreError> {
        let lock = self.key_lock(job_id).await;
        let _guard = lock.lock().await;

        let mut record = self.load(job_id).await?.ok_or(StoreError::NotFound(job_id))?;
        let effective = apply_advance(&mut record, state);
        self.persist(job_id, &record).await?;
        Ok(effective)
    }

    async fn complete(&self, job_id: JobId, result: ResultRef) -> Result<ResultRef, StoreError> {
        let lock = self.key_lock(job_id).await;
        let _guard = lock.lock().await;

        let mut record = self.load(job_id).await?.ok_or(StoreError::NotFound(job_id))?;
        let stored = apply_complete(job_id, &mut record, result)?;
        self.persist(job_id, &record).await?;
        Ok(stored)
    }
}
