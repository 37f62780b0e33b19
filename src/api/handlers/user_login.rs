use super::{types::SessionResponse, ApiError};
use crate::auth::{AuthService, Credentials};
use axum::{extract::Extension, Json};
use std::sync::Arc;
use tracing::instrument;

pub const LOGIN_FAILED: &str = "Login failed. Please try again.";

#[utoipa::path(
    post,
    path= "/api/auth/login",
    request_body = Credentials,
    responses (
        (status = 200, description = "Login successful", body = SessionResponse, content_type = "application/json"),
        (status = 400, description = "Email and password are required", body = super::types::ErrorResponse),
        (status = 401, description = "Invalid email or password", body = super::types::ErrorResponse),
        (status = 500, description = "Login failed", body = super::types::ErrorResponse),
    ),
    tag= "auth"
)]
// axum handler for login
#[instrument(skip(auth))]
pub async fn login(
    auth: Extension<Arc<AuthService>>,
    payload: Option<Json<Credentials>>,
) -> Result<Json<SessionResponse>, ApiError> {
    let credentials = payload.map(|Json(payload)| payload).unwrap_or_default();

    let session = auth
        .login(credentials)
        .await
        .map_err(|err| ApiError::from_auth(&err, LOGIN_FAILED))?;

    Ok(Json(session.into()))
}
