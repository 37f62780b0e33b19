use super::{types::SessionResponse, ApiError};
use crate::auth::{AuthService, Registration};
use axum::{extract::Extension, http::StatusCode, Json};
use std::sync::Arc;
use tracing::instrument;

pub const REGISTRATION_FAILED: &str = "Registration failed. Please try again.";

#[utoipa::path(
    post,
    path= "/api/auth/register",
    request_body = Registration,
    responses (
        (status = 201, description = "Registration successful", body = SessionResponse, content_type = "application/json"),
        (status = 400, description = "Missing fields, weak password, invalid input or email already registered", body = super::types::ErrorResponse),
        (status = 500, description = "Registration failed", body = super::types::ErrorResponse),
    ),
    tag= "auth"
)]
// axum handler for register
#[instrument(skip(auth))]
pub async fn register(
    auth: Extension<Arc<AuthService>>,
    payload: Option<Json<Registration>>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    // An unreadable body is treated as an empty registration.
    let registration = payload.map(|Json(payload)| payload).unwrap_or_default();

    let session = auth
        .register(registration)
        .await
        .map_err(|err| ApiError::from_auth(&err, REGISTRATION_FAILED))?;

    Ok((StatusCode::CREATED, Json(session.into())))
}
