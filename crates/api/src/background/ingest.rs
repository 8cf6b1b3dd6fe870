//! Backgrounded submit-and-wait ingestion.
//!
//! In background mode the upload handler returns as soon as the job
//! record exists; this task owns the provider submission and then polls
//! until the job is terminal. Unlike the fire-and-forget thread this
//! replaces, the loop is bounded by a deadline and cancelled on server
//! shutdown — a job interrupted mid-loop stays in its last persisted
//! state, where external `/progress` polling picks it up again.

use std::time::Duration;

use tokio::task::JoinHandle;

use rendergate_core::provider::SubmitInput;
use rendergate_core::JobId;

use crate::state::AppState;

/// Spawn the ingest cycle for one job.
pub fn spawn(state: AppState, job_id: JobId, input: SubmitInput) -> JoinHandle<()> {
    tokio::spawn(run(state, job_id, input))
}

/// Submit `job_id` and poll it to completion.
pub async fn run(state: AppState, job_id: JobId, input: SubmitInput) {
    if let Err(e) = state.controller.submit(job_id, &input).await {
        // The controller already terminalized the job; polling clients
        // will observe the failure.
        tracing::warn!(job_id = %job_id, error = %e, "Background submission failed");
        return;
    }

    let deadline = Duration::from_secs(state.config.ingest_deadline_secs);
    let interval = Duration::from_secs(state.config.poll_interval_secs);
    let cancel = state.shutdown.child_token();

    let outcome = tokio::time::timeout(
        deadline,
        state.controller.run_to_completion(job_id, interval, cancel),
    )
    .await;

    match outcome {
        Ok(Ok(final_state)) => {
            tracing::info!(
                job_id = %job_id,
                state = final_state.as_str(),
                "Background ingest finished",
            );
        }
        Ok(Err(e)) => {
            tracing::warn!(job_id = %job_id, error = %e, "Background ingest failed");
        }
        Err(_) => {
            tracing::warn!(
                job_id = %job_id,
                deadline_secs = state.config.ingest_deadline_secs,
                "Background ingest deadline exceeded; job left in last persisted state",
            );
        }
    }
}
