//! The job lifecycle controller.
//!
//! Maps the provider's externally-owned, asynchronously-completing job
//! onto the locally observable progress value. Every transition funnels
//! through the store's monotonic operations, so repeated polls,
//! concurrent polls, and out-of-order provider responses can never move
//! a job backward or thaw a terminal state.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::CoreError;
use crate::progress::JobState;
use crate::provider::{PollStatus, Provider, SubmitInput};
use crate::record::ResultRef;
use crate::resolver::ResultResolver;
use crate::store::ProgressStore;
use crate::types::JobId;

/// Drives jobs between the progress store and the provider.
///
/// Stateless apart from its collaborators; safe to share across
/// concurrent requests, including concurrent polls for the same job.
pub struct JobController {
    store: Arc<dyn ProgressStore>,
    provider: Arc<dyn Provider>,
    resolver: ResultResolver,
}

impl JobController {
    pub fn new(
        store: Arc<dyn ProgressStore>,
        provider: Arc<dyn Provider>,
        resolver: ResultResolver,
    ) -> Self {
        Self {
            store,
            provider,
            resolver,
        }
    }

    /// Create a fresh job record in [`JobState::Submitted`].
    ///
    /// Split from [`submit`](Self::submit) so the backgrounded ingestion
    /// mode can return the job id before the provider round-trip.
    pub async fn create_job(&self) -> Result<JobId, CoreError> {
        let job_id = JobId::new_v4();
        self.store.create(job_id).await?;
        tracing::debug!(job_id = %job_id, "Job created");
        Ok(job_id)
    }

    /// Hand an already-created job to the provider.
    ///
    /// On success the correlation id is persisted and the job advances
    /// to [`JobState::Accepted`]. Any provider error terminalizes the
    /// job as failed and is returned to the caller — this is the one
    /// path where failure is reported synchronously instead of via
    /// polling.
    pub async fn submit(&self, job_id: JobId, input: &SubmitInput) -> Result<(), CoreError> {
        match self.provider.submit(input).await {
            Ok(provider_job_id) => {
                self.store.mark_accepted(job_id, &provider_job_id).await?;
                tracing::info!(
                    job_id = %job_id,
                    provider_job_id = %provider_job_id,
                    "Job accepted by provider",
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!(job_id = %job_id, error = %e, "Provider rejected submission");
                self.store.advance(job_id, JobState::Failed).await?;
                Err(CoreError::Provider(e))
            }
        }
    }

    /// Create a job and submit it in one call (synchronous ingestion).
    pub async fn ingest(&self, input: &SubmitInput) -> Result<JobId, CoreError> {
        let job_id = self.create_job().await?;
        self.submit(job_id, input).await?;
        Ok(job_id)
    }

    /// Answer a progress query, advancing the state machine.
    ///
    /// Terminal jobs are returned immediately with no provider contact.
    /// Jobs without a correlation id (submission never completed)
    /// return their stored state. A provider transport error is "no new
    /// information": the last known state is returned unchanged.
    pub async fn poll(&self, job_id: JobId) -> Result<JobState, CoreError> {
        let record = self
            .store
            .get(job_id)
            .await?
            .ok_or(CoreError::NotFound(job_id))?;

        if record.state.is_terminal() {
            return Ok(record.state);
        }

        let Some(provider_job_id) = record.provider_job_id.as_deref() else {
            return Ok(record.state);
        };

        match self.provider.poll(provider_job_id).await {
            Err(e) => {
                // Transient by policy: a failed status query never fails
                // the job itself.
                tracing::debug!(
                    job_id = %job_id,
                    error = %e,
                    "Provider status query failed; keeping last known progress",
                );
                Ok(record.state)
            }
            Ok(PollStatus::InProgress) => Ok(self.store.advance(job_id, JobState::Running).await?),
            Ok(PollStatus::Failed) => {
                tracing::info!(job_id = %job_id, "Provider reported job failed");
                Ok(self.store.advance(job_id, JobState::Failed).await?)
            }
            Ok(PollStatus::Succeeded { output }) => {
                match self.resolver.resolve(job_id, &output).await {
                    Ok(result) => {
                        self.store.complete(job_id, result).await?;
                        tracing::info!(job_id = %job_id, "Job succeeded");
                        Ok(JobState::Succeeded)
                    }
                    Err(e @ CoreError::MalformedOutput(_)) => {
                        tracing::warn!(job_id = %job_id, error = %e, "Unusable provider output");
                        self.store.advance(job_id, JobState::Failed).await?;
                        Err(e)
                    }
                    // Local I/O trouble is not the provider's verdict;
                    // leave the job as-is so a later poll can retry the
                    // resolution.
                    Err(e) => Err(e),
                }
            }
        }
    }

    /// Result reference for a finished job.
    ///
    /// `NotFound` for unknown ids, `NotReady` for known jobs that have
    /// not succeeded (yet, or ever).
    pub async fn result(&self, job_id: JobId) -> Result<ResultRef, CoreError> {
        let record = self
            .store
            .get(job_id)
            .await?
            .ok_or(CoreError::NotFound(job_id))?;
        record.result.ok_or(CoreError::NotReady(job_id))
    }

    /// Inline-wait mode: poll on an interval until the job is terminal.
    ///
    /// Suspends only at network boundaries. Returns the terminal state,
    /// or the last persisted state if `cancel` fires first; callers
    /// bound the loop with a deadline (`tokio::time::timeout`). A crash
    /// mid-loop leaves the job in its last persisted non-terminal
    /// state, which external polling can still pick up.
    pub async fn run_to_completion(
        &self,
        job_id: JobId,
        poll_interval: Duration,
        cancel: CancellationToken,
    ) -> Result<JobState, CoreError> {
        let mut interval = tokio::time::interval(poll_interval);
        loop {
            tokio::select! {
                // Checked first so shutdown wins over an already-due tick.
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!(job_id = %job_id, "Poll loop cancelled");
                    let record = self
                        .store
                        .get(job_id)
                        .await?
                        .ok_or(CoreError::NotFound(job_id))?;
                    return Ok(record.state);
                }
                _ = interval.tick() => {
                    let state = self.poll(job_id).await?;
                    if state.is_terminal() {
                        return Ok(state);
                    }
                }
            }
        }
    }
}

