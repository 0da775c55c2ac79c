use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use skiff_cloud::catalog::CatalogError;
use skiff_cloud::provision::ProvisionError;
use skiff_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps domain errors from `skiff_core` and `skiff_cloud` and adds
/// HTTP-specific variants. Implements [`IntoResponse`] to produce
/// consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `skiff_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A catalog listing failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Droplet creation failed.
    #[error(transparent)]
    Provision(#[from] ProvisionError),

    /// No usable provider credential.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, key } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("No {entity} matches \"{key}\""),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Config(msg) => {
                    tracing::error!(error = %msg, "Server-side configuration error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Catalog listing ---
            AppError::Catalog(err) => {
                tracing::error!(error = %err, "Catalog listing failed");
                (StatusCode::BAD_GATEWAY, "CATALOG_UNAVAILABLE", err.to_string())
            }

            // --- Provisioning, by category ---
            AppError::Provision(err) => {
                let (status, code) = match err {
                    ProvisionError::Auth { .. } => (StatusCode::BAD_GATEWAY, "PROVIDER_AUTH"),
                    ProvisionError::Quota { .. } => (StatusCode::TOO_MANY_REQUESTS, "PROVIDER_QUOTA"),
                    ProvisionError::Validation { .. } => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "PROVIDER_VALIDATION")
                    }
                    ProvisionError::Network { .. } => {
                        (StatusCode::SERVICE_UNAVAILABLE, "PROVIDER_UNAVAILABLE")
                    }
                    ProvisionError::Unknown { .. } => (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR"),
                };
                (status, code, err.to_string())
            }

            // --- HTTP-specific errors ---
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
