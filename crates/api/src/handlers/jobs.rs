//! Handlers for the job endpoints: upload, upload by URL, progress,
//! download.
//!
//! Routes and response shapes follow the legacy wire contract: flat
//! JSON bodies, `percent: -1` for both failed and unknown jobs (the
//! added `state` field tells them apart), and a 404 "Not ready" from
//! the download endpoint until a result exists.

use axum::body::Body;
use axum::extract::{Multipart, Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tokio_util::io::ReaderStream;
use validator::Validate;

use rendergate_core::provider::SubmitInput;
use rendergate_core::{CoreError, JobId, ResultRef};

use crate::background;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub job_id: JobId,
}

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    /// Legacy percent: 5/20/50/100 or -1 for failed-or-unknown.
    pub percent: i32,
    /// Disambiguates the `-1` conflation: `"failed"` vs `"unknown"`.
    pub state: &'static str,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UploadUrlRequest {
    #[validate(url(message = "must be a valid URL"))]
    pub url: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Kick off a job for an already-prepared submit payload.
///
/// In synchronous mode a provider rejection surfaces here as an error
/// (and the job is already terminalized as failed). In background mode
/// the handler returns immediately and the spawned task owns the
/// submit-and-wait cycle.
async fn start_job(state: &AppState, job_id: JobId, input: SubmitInput) -> AppResult<()> {
    if state.config.background_ingest {
        background::ingest::spawn(state.clone(), job_id, input);
    } else {
        state.controller.submit(job_id, &input).await?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Upload (multipart file)
// ---------------------------------------------------------------------------

/// POST /upload
///
/// Accepts a multipart `file` field, persists the payload under the
/// input directory, and submits it inline (base64) to the provider.
/// Returns `{ "job_id": ... }`.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut data = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("file") {
            data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?,
            );
            break;
        }
    }
    let data = data.ok_or_else(|| AppError::BadRequest("missing `file` field".into()))?;
    if data.is_empty() {
        return Err(AppError::BadRequest("uploaded file is empty".into()));
    }

    let job_id = state.controller.create_job().await?;

    // Keep the raw upload around for traceability / reprocessing.
    let input_path = state
        .config
        .storage
        .input_dir()
        .join(format!("{job_id}.mp4"));
    tokio::fs::write(&input_path, &data)
        .await
        .map_err(|e| AppError::InternalError(format!("failed to persist upload: {e}")))?;

    tracing::info!(
        job_id = %job_id,
        size = data.len(),
        "Upload received",
    );

    let input = SubmitInput::VideoBase64(BASE64.encode(&data));
    start_job(&state, job_id, input).await?;

    Ok(Json(UploadResponse { job_id }))
}

// ---------------------------------------------------------------------------
// Upload (remote URL)
// ---------------------------------------------------------------------------

/// POST /upload-url
///
/// JSON `{ "url": "https://..." }`. The provider fetches the payload
/// itself; nothing is stored locally on ingestion.
pub async fn upload_url(
    State(state): State<AppState>,
    Json(request): Json<UploadUrlRequest>,
) -> AppResult<impl IntoResponse> {
    request
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let job_id = state.controller.create_job().await?;
    tracing::info!(job_id = %job_id, url = %request.url, "URL ingestion received");

    start_job(&state, job_id, SubmitInput::VideoUrl(request.url)).await?;

    Ok(Json(UploadResponse { job_id }))
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// GET /progress/{job_id}
///
/// Drives the lifecycle state machine one step and reports the result.
/// Never fails for unknown ids or provider trouble: unknown jobs and
/// malformed provider output both collapse to `percent: -1` on the
/// wire, per the legacy contract.
pub async fn progress(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> AppResult<Json<ProgressResponse>> {
    // Ids we never issued (including unparseable ones) are "unknown",
    // not an input error — legacy clients poll blindly.
    let Ok(job_id) = job_id.parse::<JobId>() else {
        return Ok(Json(ProgressResponse {
            percent: -1,
            state: "unknown",
        }));
    };

    match state.controller.poll(job_id).await {
        Ok(job_state) => Ok(Json(ProgressResponse {
            percent: job_state.percent(),
            state: job_state.as_str(),
        })),
        Err(CoreError::NotFound(_)) => Ok(Json(ProgressResponse {
            percent: -1,
            state: "unknown",
        })),
        Err(e @ CoreError::MalformedOutput(_)) => {
            // The controller already terminalized the job.
            tracing::warn!(job_id = %job_id, error = %e, "Job failed on unusable provider output");
            Ok(Json(ProgressResponse {
                percent: -1,
                state: "failed",
            }))
        }
        Err(e) => Err(e.into()),
    }
}

// ---------------------------------------------------------------------------
// Download
// ---------------------------------------------------------------------------

/// GET /download/{job_id}
///
/// Streams a locally resolved artifact, or redirects to the provider's
/// URL. 404 "Not ready" until the job succeeds (and for ids that do
/// not exist — the legacy contract does not distinguish).
pub async fn download(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> AppResult<Response> {
    let Ok(job_id) = job_id.parse::<JobId>() else {
        return Err(AppError::NotReady);
    };

    let result = match state.controller.result(job_id).await {
        Ok(result) => result,
        Err(CoreError::NotFound(_) | CoreError::NotReady(_)) => return Err(AppError::NotReady),
        Err(e) => return Err(e.into()),
    };

    match result {
        ResultRef::Url(url) => Ok(Redirect::temporary(&url).into_response()),
        ResultRef::File(path) => {
            let file = match tokio::fs::File::open(&path).await {
                Ok(file) => file,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    // Record says succeeded but the artifact is gone
                    // (manual cleanup, volume swap). Surface as not
                    // ready rather than a 500.
                    tracing::warn!(job_id = %job_id, path = %path.display(), "Result artifact missing");
                    return Err(AppError::NotReady);
                }
                Err(e) => {
                    return Err(AppError::InternalError(format!(
                        "failed to open result artifact: {e}"
                    )))
                }
            };

            let stream = ReaderStream::new(file);
            let response = Response::builder()
                .header(header::CONTENT_TYPE, "video/mp4")
                .header(
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{job_id}.mp4\""),
                )
                .body(Body::from_stream(stream))
                .map_err(|e| AppError::InternalError(e.to_string()))?;
            Ok(response)
        }
    }
}
