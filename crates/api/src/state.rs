use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use rendergate_core::JobController;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`. Cheaply cloneable.
#[derive(Clone)]
pub struct AppState {
    /// The job lifecycle controller (store + provider + resolver).
    pub controller: Arc<JobController>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Cancelled on graceful shutdown; background ingest loops hang off
    /// child tokens of this one.
    pub shutdown: CancellationToken,
}
