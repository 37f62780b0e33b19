//! Response bodies shared by the API handlers.

use crate::auth::{PublicUser, Session, SessionClaims};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone)]
pub struct SessionResponse {
    pub success: bool,
    pub token: String,
    pub user: PublicUser,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            success: true,
            token: session.token,
            user: session.user,
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone)]
pub struct UserResponse {
    pub success: bool,
    pub user: PublicUser,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone)]
pub struct ClaimsResponse {
    pub success: bool,
    pub user: SessionClaims,
}

/// Uniform failure envelope: `{"success": false, "error": "..."}`.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}
