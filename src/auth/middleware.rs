//! Auth middleware for Axum routes.
//!
//! Verifies the request credential and injects the caller's [`AuthUser`] into
//! request extensions. Implements deny-by-default: if no verifier is
//! configured, all requests are rejected.

use crate::api::handlers::{AppError, SharedState};
use crate::auth::extractor::AuthUser;
use crate::notes::NoteError;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

/// Header used by the original web client instead of `Authorization`
pub const AUTH_TOKEN_HEADER: &str = "auth-token";

/// Pull the credential out of `Authorization: Bearer <token>` or `auth-token: <token>`.
fn extract_credential(headers: &HeaderMap) -> Result<&str, AppError> {
    if let Some(value) = headers.get("authorization") {
        let value = value
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid Authorization header".to_string()))?;
        return value.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Unauthorized("Invalid Authorization header format".to_string())
        });
    }

    headers
        .get(AUTH_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))
}

/// Middleware that requires a verified identity.
///
/// # Behavior
/// 1. If no verifier is configured → 403 Forbidden (deny-by-default)
/// 2. Extract the credential → 401 if missing or malformed
/// 3. Verify it → 401 if invalid/expired
/// 4. Inject `AuthUser` into request extensions for downstream handlers
pub async fn require_auth(
    State(state): State<SharedState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let verifier = state.verifier.as_ref().ok_or_else(|| {
        AppError::Forbidden("Authentication not configured, access denied".to_string())
    })?;

    let credential = extract_credential(req.headers())?;

    // The rejection reason is logged, not returned
    let user_id = verifier.verify(credential).map_err(|e| {
        tracing::warn!(error = %e, "Rejected request credential");
        NoteError::from(e)
    })?;

    req.extensions_mut().insert(AuthUser { user_id });

    Ok(next.run(req).await)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::{encode_jwt, Claims};
    use crate::store::MemoryNoteStore;
    use crate::test_helpers::{bearer_for, server_state_with, test_auth_config, TEST_SECRET};
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode};
    use axum::middleware::from_fn_with_state;
    use axum::routing::get;
    use axum::Router;
    use std::sync::Arc;
    use tower::ServiceExt; // for `oneshot`

    /// Build a test router with the auth middleware applied
    fn test_app(auth_config: Option<crate::AuthConfig>) -> Router {
        let state = server_state_with(Arc::new(MemoryNoteStore::new()), auth_config);

        // Echoes the verified user id
        async fn whoami(user: AuthUser) -> String {
            user.user_id.to_string()
        }

        Router::new()
            .route("/test", get(whoami))
            .layer(from_fn_with_state(state.clone(), require_auth))
            .with_state(state)
    }

    fn request(header: Option<(&str, String)>) -> HttpRequest<Body> {
        let mut builder = HttpRequest::builder().uri("/test");
        if let Some((name, value)) = header {
            builder = builder.header(name, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_no_auth_config_returns_403() {
        let app = test_app(None);
        let resp = app.oneshot(request(None)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_no_header_returns_401() {
        let app = test_app(Some(test_auth_config()));
        let resp = app.oneshot(request(None)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_token_returns_401() {
        let app = test_app(Some(test_auth_config()));
        let req = request(Some(("authorization", "Bearer invalid.token.here".into())));
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_rejected_token_reason_not_exposed() {
        let app = test_app(Some(test_auth_config()));
        let token = encode_jwt(uuid::Uuid::new_v4(), "some-other-secret-with-32-chars!!", 3600)
            .unwrap();

        let req = request(Some(("authorization", format!("Bearer {}", token))));
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "authentication required");
    }

    #[tokio::test]
    async fn test_non_bearer_scheme_returns_401() {
        let app = test_app(Some(test_auth_config()));
        let req = request(Some(("authorization", "Basic dXNlcjpwYXNz".into())));
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_expired_token_returns_401() {
        let app = test_app(Some(test_auth_config()));

        // Craft an expired token
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: uuid::Uuid::new_v4().to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap();

        let req = request(Some(("authorization", format!("Bearer {}", token))));
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_bearer_token_passes() {
        let app = test_app(Some(test_auth_config()));
        let user_id = uuid::Uuid::new_v4();

        let req = request(Some(("authorization", bearer_for(user_id))));
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(body, user_id.to_string());
    }

    #[tokio::test]
    async fn test_legacy_auth_token_header_passes() {
        let app = test_app(Some(test_auth_config()));
        let token = encode_jwt(uuid::Uuid::new_v4(), TEST_SECRET, 3600).unwrap();

        let req = request(Some((AUTH_TOKEN_HEADER, token)));
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
