//! API handlers for notes
//!
//! Every handler runs behind `require_auth`, so the caller's identity is
//! always available through [`AuthUser`]. Bodies arrive as raw bytes: an
//! update body is only decoded after the id and ownership checks.

use super::handlers::{AppError, SharedState};
use crate::auth::AuthUser;
use crate::notes::{parse_json_body, CreateNoteRequest, DeletedNote, Note, NoteError};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::Uri,
    Json,
};

/// List the caller's notes
pub async fn list_notes(
    State(state): State<SharedState>,
    user: AuthUser,
) -> Result<Json<Vec<Note>>, AppError> {
    let notes = state.notes.list_notes(user.user_id).await?;
    Ok(Json(notes))
}

/// Create a note owned by the caller
pub async fn create_note(
    State(state): State<SharedState>,
    user: AuthUser,
    body: Bytes,
) -> Result<Json<Note>, AppError> {
    let req: CreateNoteRequest = parse_json_body(&body)?;
    let note = state.notes.create_note(user.user_id, req).await?;
    Ok(Json(note))
}

/// Update a note
pub async fn update_note(
    State(state): State<SharedState>,
    user: AuthUser,
    Path(note_id): Path<String>,
    body: Bytes,
) -> Result<Json<Note>, AppError> {
    let note = state
        .notes
        .update_note_from_body(user.user_id, &note_id, &body)
        .await?;
    Ok(Json(note))
}

/// Delete a note
pub async fn delete_note(
    State(state): State<SharedState>,
    user: AuthUser,
    Path(note_id): Path<String>,
) -> Result<Json<DeletedNote>, AppError> {
    let deleted = state.notes.delete_note(user.user_id, &note_id).await?;
    Ok(Json(deleted))
}

/// `PUT`/`DELETE` on a fixed path such as `/api/notes/addnote`, whose last
/// segment takes the place of a note id
pub async fn reject_fixed_segment(_user: AuthUser, uri: Uri) -> AppError {
    let segment = uri.path().rsplit('/').next().unwrap_or_default();
    NoteError::InvalidArgument(format!("Invalid note id: {}", segment)).into()
}
