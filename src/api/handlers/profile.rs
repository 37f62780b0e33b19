use super::{require_auth, types::UserResponse, ApiError};
use crate::auth::AuthService;
use axum::{extract::Extension, http::HeaderMap, Json};
use std::sync::Arc;
use tracing::instrument;

pub const PROFILE_FAILED: &str = "Failed to fetch profile";

#[utoipa::path(
    get,
    path= "/api/auth/profile",
    responses (
        (status = 200, description = "Stored profile of the token's user", body = UserResponse, content_type = "application/json"),
        (status = 401, description = "Access token required", body = super::types::ErrorResponse),
        (status = 403, description = "Invalid or expired token", body = super::types::ErrorResponse),
        (status = 404, description = "User not found", body = super::types::ErrorResponse),
    ),
    security(("bearer_auth" = [])),
    tag= "auth"
)]
#[instrument(skip_all)]
pub async fn profile(
    headers: HeaderMap,
    auth: Extension<Arc<AuthService>>,
) -> Result<Json<UserResponse>, ApiError> {
    let claims = require_auth(&headers, &auth)?;

    let user = auth
        .get_profile(&claims.user_id)
        .await
        .map_err(|err| ApiError::from_auth(&err, PROFILE_FAILED))?;

    Ok(Json(UserResponse {
        success: true,
        user,
    }))
}
