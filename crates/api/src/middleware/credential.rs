//! Provider credential extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::state::AppState;

/// DigitalOcean API token for the current request.
///
/// Taken from an `Authorization: Bearer <token>` header, falling back to
/// the server's configured `DO_API_TOKEN`. The token is passed through to
/// the provider and never stored.
#[derive(Clone)]
pub struct ApiToken(pub String);

impl FromRequestParts<AppState> for ApiToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(header) = parts.headers.get("authorization") {
            let token = header
                .to_str()
                .ok()
                .and_then(|v| v.strip_prefix("Bearer "))
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .ok_or_else(|| {
                    AppError::Unauthorized(
                        "Invalid Authorization format. Expected: Bearer <token>".into(),
                    )
                })?;
            return Ok(ApiToken(token.to_string()));
        }

        state
            .config
            .do_api_token
            .clone()
            .map(ApiToken)
            .ok_or_else(|| AppError::Unauthorized("No DigitalOcean API token supplied".into()))
    }
}
