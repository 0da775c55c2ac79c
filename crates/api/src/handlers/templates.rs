//! Read-only view of the pool's templates.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use skiff_core::labels::LabelSet;
use skiff_core::template::ProvisionTemplate;

use crate::error::AppResult;
use crate::handlers::require_pool;
use crate::response::DataResponse;
use crate::state::AppState;

/// Every accessor of a template, flattened for JSON.
#[derive(Debug, Serialize)]
pub struct TemplateView {
    pub pool_name: String,
    pub image_id: String,
    pub size_id: String,
    pub region_id: String,
    pub labels: String,
    pub label_set: LabelSet,
    pub idle_termination_minutes: u32,
    pub remote_user: String,
    pub remote_path: String,
    pub num_executors: u32,
}

impl From<&ProvisionTemplate> for TemplateView {
    fn from(t: &ProvisionTemplate) -> Self {
        Self {
            pool_name: t.pool_name().to_string(),
            image_id: t.image_id().to_string(),
            size_id: t.size_id().to_string(),
            region_id: t.region_id().to_string(),
            labels: t.labels().to_string(),
            label_set: t.label_set().clone(),
            idle_termination_minutes: t.idle_termination_minutes(),
            remote_user: t.remote_user().to_string(),
            remote_path: t.remote_path().to_string(),
            num_executors: t.num_executors(),
        }
    }
}

/// GET /templates
pub async fn list_templates(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<TemplateView>>>> {
    let pool = require_pool(&state)?;
    let data = pool.templates().iter().map(TemplateView::from).collect();
    Ok(Json(DataResponse { data }))
}
