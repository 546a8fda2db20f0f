//! AuthUser extractor for Axum handlers.
//!
//! Extracts the authenticated user's identity from request extensions
//! (populated by the `require_auth` middleware).

use crate::api::handlers::{AppError, SharedState};
use crate::notes::UserId;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// Authenticated user identity.
///
/// Use this as a handler parameter to require authentication
/// and access the caller's id:
///
/// ```rust,ignore
/// async fn my_handler(user: AuthUser) -> impl IntoResponse {
///     format!("Hello, {}!", user.user_id)
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: UserId,
}

impl FromRequestParts<SharedState> for AuthUser {
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &SharedState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let user = parts.extensions.get::<AuthUser>().copied();
        async move {
            user.ok_or_else(|| {
                AppError::Unauthorized("Authentication required: no identity in request".to_string())
            })
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
