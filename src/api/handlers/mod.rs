//! API handlers and shared utilities.
//!
//! Every failure leaves a handler as an [`ApiError`], which renders the
//! `{success: false, error}` envelope. Internal failures are logged and
//! replaced with the endpoint's generic message.

pub mod health;
pub mod profile;
pub mod types;
pub mod user_login;
pub mod user_register;
pub mod verify;

use crate::auth::{self, AuthService, ErrorKind, SessionClaims};
use axum::{
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use tracing::error;
use types::ErrorResponse;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Map a service error to a response. `internal_message` replaces the
    /// detail of store/hashing failures, which are only logged.
    #[must_use]
    pub fn from_auth(err: &auth::Error, internal_message: &str) -> Self {
        let status = match err.kind() {
            ErrorKind::Validation | ErrorKind::Conflict => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorKind::InvalidToken => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Internal => {
                error!("{internal_message}: {err:?}");

                return Self::new(StatusCode::INTERNAL_SERVER_ERROR, internal_message);
            }
        };

        Self::new(status, err.to_string())
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            success: false,
            error: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;

    scheme
        .eq_ignore_ascii_case("bearer")
        .then(|| token.trim())
        .filter(|token| !token.is_empty())
}

/// Resolve the bearer token into session claims, or fail with 401/403.
///
/// # Errors
/// 401 when the header is missing, 403 when the token is invalid or expired.
pub fn require_auth(headers: &HeaderMap, auth: &AuthService) -> Result<SessionClaims, ApiError> {
    auth.verify_token(bearer_token(headers))
        .map_err(|err| ApiError::from_auth(&err, "Token verification failed"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn bearer_token_parsing() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("bearer  abc")), Some("abc"));
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn auth_errors_map_to_statuses() {
        let cases = [
            (auth::Error::WeakPassword, StatusCode::BAD_REQUEST),
            (auth::Error::EmailTaken, StatusCode::BAD_REQUEST),
            (auth::Error::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (auth::Error::MissingToken, StatusCode::UNAUTHORIZED),
            (
                auth::Error::InvalidToken(auth::jwt::Error::Expired),
                StatusCode::FORBIDDEN,
            ),
            (auth::Error::UserNotFound, StatusCode::NOT_FOUND),
        ];

        for (err, status) in cases {
            let api_error = ApiError::from_auth(&err, "unused");
            assert_eq!(api_error.status(), status);
            assert_eq!(api_error.message(), err.to_string());
        }
    }

    #[test]
    fn internal_errors_hide_details() {
        let err = auth::Error::Hash("argon2 exploded".to_string());
        let api_error = ApiError::from_auth(&err, "Registration failed. Please try again.");

        assert_eq!(api_error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.message(), "Registration failed. Please try again.");
    }
}
