//! Shared server state, error mapping and the health handler

use crate::auth::IdentityVerifier;
use crate::notes::{NoteError, NoteManager, Violation};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

/// Shared server state
pub struct ServerState {
    pub notes: Arc<NoteManager>,
    /// Credential verifier. None means deny-by-default
    pub verifier: Option<Arc<dyn IdentityVerifier>>,
}

/// Shared server state handle
pub type SharedState = Arc<ServerState>;

// ============================================================================
// Health check
// ============================================================================

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub store: String,
}

/// Health check handler. Verifies connectivity to the note store.
///
/// Returns:
/// - 200 + `"ok"` if the store is reachable
/// - 503 + `"unhealthy"` otherwise
pub async fn health(State(state): State<SharedState>) -> (StatusCode, Json<HealthResponse>) {
    let store_ok = state
        .notes
        .store()
        .health_check()
        .await
        .unwrap_or(false);

    let (http_status, status, store) = if store_ok {
        (StatusCode::OK, "ok", "connected")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", "disconnected")
    };

    (
        http_status,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            store: store.to_string(),
        }),
    )
}

// ============================================================================
// Error handling
// ============================================================================

#[derive(Debug)]
pub enum AppError {
    Internal(anyhow::Error),
    NotFound(String),
    BadRequest(String),
    Validation(Vec<Violation>),
    Unauthorized(String),
    Forbidden(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Internal(e) => {
                tracing::error!(error = ?e, "Internal error while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Validation(violations) => {
                let body = Json(serde_json::json!({ "errors": violations }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl From<NoteError> for AppError {
    fn from(err: NoteError) -> Self {
        match err {
            NoteError::Unauthenticated => AppError::Unauthorized(err.to_string()),
            NoteError::Validation(violations) => AppError::Validation(violations),
            NoteError::InvalidArgument(msg) => AppError::BadRequest(msg),
            NoteError::NotFound(id) => AppError::NotFound(format!("Note {} not found", id)),
            NoteError::PermissionDenied => AppError::Forbidden("Not allowed".to_string()),
            NoteError::Internal(e) => AppError::Internal(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_internal_error_hides_detail() {
        let err = AppError::from(NoteError::Internal(anyhow::anyhow!(
            "connection refused: bolt://db:7687"
        )));
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(resp).await;
        assert_eq!(body["error"], "Internal server error");
    }

    #[tokio::test]
    async fn test_validation_error_lists_violations() {
        let err = AppError::from(NoteError::Validation(vec![
            Violation {
                field: "title".into(),
                message: "title too short".into(),
            },
            Violation {
                field: "description".into(),
                message: "description too short".into(),
            },
        ]));
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = body_json(resp).await;
        let errors = body["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0]["field"], "title");
        assert_eq!(errors[1]["message"], "description too short");
    }

    #[test]
    fn test_note_error_status_mapping() {
        let cases = [
            (NoteError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (
                NoteError::InvalidArgument("bad id".into()),
                StatusCode::BAD_REQUEST,
            ),
            (NoteError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (NoteError::PermissionDenied, StatusCode::FORBIDDEN),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).into_response().status(), status);
        }
    }
}
