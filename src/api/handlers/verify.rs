use super::{require_auth, types::ClaimsResponse, ApiError};
use crate::auth::AuthService;
use axum::{extract::Extension, http::HeaderMap, Json};
use std::sync::Arc;
use tracing::instrument;

#[utoipa::path(
    get,
    path= "/api/auth/verify",
    responses (
        (status = 200, description = "Token is valid; returns its claims", body = ClaimsResponse, content_type = "application/json"),
        (status = 401, description = "Access token required", body = super::types::ErrorResponse),
        (status = 403, description = "Invalid or expired token", body = super::types::ErrorResponse),
    ),
    security(("bearer_auth" = [])),
    tag= "auth"
)]
#[instrument(skip_all)]
pub async fn verify(
    headers: HeaderMap,
    auth: Extension<Arc<AuthService>>,
) -> Result<Json<ClaimsResponse>, ApiError> {
    let claims = require_auth(&headers, &auth)?;

    Ok(Json(ClaimsResponse {
        success: true,
        user: claims,
    }))
}
