//! Caller identity extractors for axum.
//!
//! Identity is established by the upstream gateway, which forwards the
//! caller as headers:
//!
//! ```text
//! X-User-Id: <opaque user id>
//! X-User-Role: admin          (administrative endpoints only)
//! ```
//!
//! ```ignore
//! async fn my_handler(user: AuthenticatedUser) -> impl IntoResponse {
//!     format!("Hello, {}!", user.user_id)
//! }
//! ```

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::adapters::http::error::ErrorResponse;
use crate::domain::foundation::UserId;

pub const USER_ID_HEADER: &str = "X-User-Id";
pub const ROLE_HEADER: &str = "X-User-Role";

const ADMIN_ROLE: &str = "admin";

/// The caller, required on every endpoint.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// A caller carrying the administrative role.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub user_id: UserId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// Missing or blank `X-User-Id`.
    AuthenticationRequired,
    /// Authenticated, but not an administrator.
    AdminRequired,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AuthRejection::AuthenticationRequired => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new("UNAUTHORIZED", "Authentication is required"),
            ),
            AuthRejection::AdminRequired => (
                StatusCode::FORBIDDEN,
                ErrorResponse::new("FORBIDDEN", "Administrator role required"),
            ),
        };
        (status, Json(body)).into_response()
    }
}

fn user_from_headers(parts: &Parts) -> Result<UserId, AuthRejection> {
    parts
        .headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| UserId::new(s.trim()).ok())
        .ok_or(AuthRejection::AuthenticationRequired)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(AuthenticatedUser {
            user_id: user_from_headers(parts)?,
        })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = user_from_headers(parts)?;
        let is_admin = parts
            .headers
            .get(ROLE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map_or(false, |role| role.trim().eq_ignore_ascii_case(ADMIN_ROLE));
        if !is_admin {
            tracing::warn!(user_id = %user_id, "Administrative endpoint refused");
            return Err(AuthRejection::AdminRequired);
        }
        Ok(AdminUser { user_id })
    }
}
