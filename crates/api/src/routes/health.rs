//! Health check routes.

use axum::routing::get;
use axum::Router;

use crate::handlers::health;
use crate::state::AppState;

/// ```text
/// GET /        -> health (legacy status document)
/// GET /health  -> health
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health::health))
        .route("/health", get(health::health))
}
