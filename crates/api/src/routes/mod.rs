//! Route definitions.
//!
//! Everything is mounted at the root: the wire contract predates API
//! versioning and existing clients hard-code `/upload`,
//! `/progress/{job_id}`, and `/download/{job_id}`.

pub mod health;
pub mod jobs;

use axum::Router;

use crate::state::AppState;

/// All application routes.
pub fn api_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(jobs::router(max_upload_bytes))
}
