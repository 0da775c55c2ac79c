pub mod catalog;
pub mod provision;
pub mod templates;

use std::sync::Arc;

use skiff_core::error::CoreError;
use skiff_core::pool::WorkerPool;

use crate::error::AppResult;
use crate::state::AppState;

/// The configured worker pool, or 404 when the server runs without one.
pub(crate) fn require_pool(state: &AppState) -> AppResult<Arc<WorkerPool>> {
    state.pool.clone().ok_or_else(|| {
        CoreError::NotFound {
            entity: "pool",
            key: "configured".to_string(),
        }
        .into()
    })
}
