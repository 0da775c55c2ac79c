pub mod catalog;
pub mod health;
pub mod workers;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /catalog/sizes                  size options (GET)
/// /catalog/images                 image options (GET)
/// /catalog/regions                region options (GET)
///
/// /templates                      pool templates (GET)
/// /names                          generate a droplet name (POST)
/// /provision                      provision a worker (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/catalog", catalog::router())
        .merge(workers::router())
}
