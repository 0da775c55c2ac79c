//! Handlers for naming and provisioning workers.

use std::path::Path;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use skiff_cloud::provision::provision;
use skiff_core::error::CoreError;
use skiff_core::naming;
use skiff_core::worker::WorkerDescriptor;

use crate::error::{AppError, AppResult};
use crate::handlers::require_pool;
use crate::middleware::credential::ApiToken;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for provisioning a worker.
#[derive(Debug, Default, Deserialize)]
pub struct ProvisionRequest {
    /// Label expression selecting the template. Absent selects the first.
    pub label: Option<String>,
    /// Name to give the droplet. Generated when absent.
    pub droplet_name: Option<String>,
}

/// A provisioned worker plus the progress lines written while creating it.
#[derive(Debug, Serialize)]
pub struct ProvisionResponse {
    pub worker: WorkerDescriptor,
    pub progress: Vec<String>,
}

/// A freshly generated droplet name.
#[derive(Debug, Serialize)]
pub struct NameResponse {
    pub name: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /names
///
/// Reserve nothing; just hand out a name unique enough to use directly.
pub async fn create_name() -> Json<DataResponse<NameResponse>> {
    Json(DataResponse {
        data: NameResponse {
            name: naming::droplet_name(),
        },
    })
}

/// POST /provision
///
/// Create one droplet from the pool template matching `label` and return
/// its worker descriptor. The caller owns the droplet from here on.
pub async fn provision_worker(
    State(state): State<AppState>,
    ApiToken(token): ApiToken,
    Json(input): Json<ProvisionRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ProvisionResponse>>)> {
    let pool = require_pool(&state)?;
    let template = pool.template_for(input.label.as_deref())?;

    let droplet_name = match input.droplet_name {
        Some(name) if naming::is_valid_droplet_name(&name) => {
            if !naming::is_generated_name(&name) {
                tracing::debug!(%name, "Using caller-supplied droplet name");
            }
            name
        }
        Some(name) => {
            return Err(AppError::BadRequest(format!(
                "\"{name}\" is not a valid droplet name"
            )));
        }
        None => template.create_droplet_name(),
    };

    let private_key = read_private_key(pool.private_key_path()).await?;
    let provider = state.connector.connect(&token);
    let mut progress: Vec<String> = Vec::new();

    let worker = provision(
        template,
        provider.as_ref(),
        &droplet_name,
        &private_key,
        pool.ssh_key_id(),
        &mut progress,
    )
    .await?;

    tracing::info!(
        pool = %worker.pool_name,
        name = %worker.name,
        droplet_id = worker.droplet_id,
        "Worker provisioned",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: ProvisionResponse { worker, progress },
        }),
    ))
}

/// Read the pool's private key without blocking the runtime.
async fn read_private_key(path: &Path) -> AppResult<String> {
    tokio::fs::read_to_string(path).await.map_err(|e| {
        CoreError::Config(format!("Cannot read private key {}: {e}", path.display())).into()
    })
}
