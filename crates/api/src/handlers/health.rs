//! Health check handler.

use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// GET / and GET /health
///
/// Liveness probe. `/` is kept because the legacy wire contract served
/// its status document at the root.
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
