//! Turns a provider result payload into a deliverable artifact.

use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::error::CoreError;
use crate::record::ResultRef;
use crate::types::JobId;

/// Resolves provider output into a [`ResultRef`].
///
/// Two output shapes are recognized, selected by which field is present:
/// `video_base64` (inline bytes, decoded and written under the output
/// directory) or `video_url` (used verbatim as a redirect target).
#[derive(Debug, Clone)]
pub struct ResultResolver {
    output_dir: PathBuf,
}

impl ResultResolver {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Resolve `output` for `job_id`.
    ///
    /// Fails with [`CoreError::MalformedOutput`] if neither recognized
    /// field is present or the inline payload does not decode.
    pub async fn resolve(
        &self,
        job_id: JobId,
        output: &serde_json::Value,
    ) -> Result<ResultRef, CoreError> {
        if let Some(encoded) = output.get("video_base64").and_then(|v| v.as_str()) {
            let bytes = BASE64
                .decode(encoded)
                .map_err(|e| CoreError::MalformedOutput(format!("invalid base64 payload: {e}")))?;
            let path = self.output_dir.join(format!("{job_id}.mp4"));

            // Write-then-rename so a concurrent download never sees a
            // half-written artifact.
            let tmp = self.output_dir.join(format!("{job_id}.mp4.part"));
            tokio::fs::write(&tmp, &bytes).await?;
            tokio::fs::rename(&tmp, &path).await?;

            tracing::debug!(job_id = %job_id, path = %path.display(), size = bytes.len(), "Result artifact written");
            Ok(ResultRef::File(path))
        } else if let Some(url) = output.get("video_url").and_then(|v| v.as_str()) {
            Ok(ResultRef::Url(url.to_string()))
        } else {
            Err(CoreError::MalformedOutput(
                "expected `video_base64` or `video_url` in provider output".into(),
            ))
        }
    }
}
