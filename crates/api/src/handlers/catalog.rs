//! Handlers that fill the template form's image, size and region selectors.
//!
//! Each call walks every catalog page from the provider; nothing is cached.

use axum::extract::State;
use axum::Json;
use skiff_cloud::catalog::{fill_image_options, fill_region_options, fill_size_options};
use skiff_core::catalog::SelectOption;

use crate::error::AppResult;
use crate::middleware::credential::ApiToken;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /catalog/sizes
pub async fn list_size_options(
    State(state): State<AppState>,
    ApiToken(token): ApiToken,
) -> AppResult<Json<DataResponse<Vec<SelectOption>>>> {
    let options = fill_size_options(state.connector.as_ref(), &token).await?;
    tracing::debug!(count = options.len(), "Listed size options");
    Ok(Json(DataResponse { data: options }))
}

/// GET /catalog/images
pub async fn list_image_options(
    State(state): State<AppState>,
    ApiToken(token): ApiToken,
) -> AppResult<Json<DataResponse<Vec<SelectOption>>>> {
    let options = fill_image_options(state.connector.as_ref(), &token).await?;
    tracing::debug!(count = options.len(), "Listed image options");
    Ok(Json(DataResponse { data: options }))
}

/// GET /catalog/regions
pub async fn list_region_options(
    State(state): State<AppState>,
    ApiToken(token): ApiToken,
) -> AppResult<Json<DataResponse<Vec<SelectOption>>>> {
    let options = fill_region_options(state.connector.as_ref(), &token).await?;
    tracing::debug!(count = options.len(), "Listed region options");
    Ok(Json(DataResponse { data: options }))
}
