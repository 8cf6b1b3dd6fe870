//! Routes for the job endpoints.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::jobs;
use crate::state::AppState;

/// ```text
/// POST /upload              -> upload (multipart file)
/// POST /upload-url          -> upload_url (JSON {url})
/// GET  /progress/{job_id}   -> progress
/// GET  /download/{job_id}   -> download
/// ```
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/upload", post(jobs::upload))
        .route("/upload-url", post(jobs::upload_url))
        .route("/progress/{job_id}", get(jobs::progress))
        .route("/download/{job_id}", get(jobs::download))
        // Axum's default 2 MB body cap is far too small for video.
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}
