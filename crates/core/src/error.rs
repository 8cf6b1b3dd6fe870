use crate::provider::ProviderError;
use crate::store::StoreError;
use crate::types::JobId;

/// Domain-level error taxonomy for the job lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Query against a job id this system never issued (or whose record
    /// is gone). Distinct from a job that failed.
    #[error("job {0} not found")]
    NotFound(JobId),

    /// The job exists but has no result yet.
    #[error("job {0} has no result yet")]
    NotReady(JobId),

    /// Provider error surfaced synchronously from the ingestion path.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Provider reported success but the result payload is unusable.
    /// The job is terminalized as failed when this is raised.
    #[error("malformed provider output: {0}")]
    MalformedOutput(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Local I/O failure while materializing a result artifact.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
