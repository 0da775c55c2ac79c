use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{provision, templates};
use crate::state::AppState;

/// ```text
/// GET  /templates  -> list_templates
/// POST /names      -> create_name
/// POST /provision  -> provision_worker
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/templates", get(templates::list_templates))
        .route("/names", post(provision::create_name))
        .route("/provision", post(provision::provision_worker))
}
