use std::sync::Arc;

use skiff_cloud::provider::ProviderConnector;
use skiff_core::pool::WorkerPool;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Builds provider clients from an API token.
    pub connector: Arc<dyn ProviderConnector>,
    /// The loaded worker pool, if a pool file was configured.
    pub pool: Option<Arc<WorkerPool>>,
}
