//! Route definitions for catalog option endpoints.

use axum::routing::get;
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Routes mounted at `/catalog`.
///
/// ```text
/// GET /sizes    -> list_size_options
/// GET /images   -> list_image_options
/// GET /regions  -> list_region_options
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sizes", get(catalog::list_size_options))
        .route("/images", get(catalog::list_image_options))
        .route("/regions", get(catalog::list_region_options))
}
