//! API route definitions

use super::handlers::{self, SharedState};
use super::note_handlers;
use crate::auth::middleware::require_auth;
use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the API router
pub fn create_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected = Router::new()
        // ====================================================================
        // Notes
        // ====================================================================
        .route(
            "/api/notes",
            get(note_handlers::list_notes).post(note_handlers::create_note),
        )
        .route(
            "/api/notes/{note_id}",
            put(note_handlers::update_note).delete(note_handlers::delete_note),
        )
        // Paths used by the original web client. Their fixed segments shadow
        // `{note_id}`, so PUT/DELETE on them answer as a malformed id.
        .route(
            "/api/notes/fetchallnotes",
            get(note_handlers::list_notes)
                .put(note_handlers::reject_fixed_segment)
                .delete(note_handlers::reject_fixed_segment),
        )
        .route(
            "/api/notes/addnote",
            post(note_handlers::create_note)
                .put(note_handlers::reject_fixed_segment)
                .delete(note_handlers::reject_fixed_segment),
        )
        .route(
            "/api/notes/updatenote/{note_id}",
            put(note_handlers::update_note),
        )
        .route(
            "/api/notes/deletenote/{note_id}",
            delete(note_handlers::delete_note),
        )
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        .merge(protected)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
