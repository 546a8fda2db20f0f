//! Note Manager - ownership-checked CRUD operations for notes
//!
//! Every operation takes an already verified caller identity. Mutations go
//! through the same sequence: parse the id, look the note up, check
//! [`owns`], then issue a single conditional write to the store.

use super::error::{NoteError, NoteResult};
use super::models::*;
use super::validation::{validate_create, validate_update};
use crate::store::NoteStore;
use std::sync::Arc;

/// Whether `identity` may mutate `note`
pub fn owns(identity: UserId, note: &Note) -> bool {
    note.owner == identity
}

/// Parse a raw path segment into a note id
pub fn parse_note_id(raw: &str) -> NoteResult<NoteId> {
    raw.parse::<NoteId>().map_err(NoteError::InvalidArgument)
}

/// Manager for note operations
pub struct NoteManager {
    store: Arc<dyn NoteStore>,
}

impl NoteManager {
    /// Create a new NoteManager
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn NoteStore> {
        &self.store
    }

    /// All notes owned by the caller
    pub async fn list_notes(&self, caller: UserId) -> NoteResult<Vec<Note>> {
        Ok(self.store.find_by_owner(caller).await?)
    }

    /// Validate and create a note owned by the caller.
    ///
    /// Nothing is written unless every field is valid.
    pub async fn create_note(&self, caller: UserId, req: CreateNoteRequest) -> NoteResult<Note> {
        let valid = validate_create(&req).map_err(NoteError::Validation)?;

        let note = self
            .store
            .insert(NewNote {
                owner: caller,
                title: valid.title,
                description: valid.description,
                priority: valid.priority,
            })
            .await?;

        tracing::info!(note_id = %note.id, owner = %caller, "Note created");
        Ok(note)
    }

    /// Partially update a note owned by the caller
    pub async fn update_note(
        &self,
        caller: UserId,
        raw_id: &str,
        req: UpdateNoteRequest,
    ) -> NoteResult<Note> {
        self.update_with(caller, raw_id, || Ok(req)).await
    }

    /// Update from a raw JSON body. The body is only decoded once the caller
    /// is known to own the note; an empty body is an empty patch.
    pub async fn update_note_from_body(
        &self,
        caller: UserId,
        raw_id: &str,
        body: &[u8],
    ) -> NoteResult<Note> {
        self.update_with(caller, raw_id, || parse_json_body(body))
            .await
    }

    async fn update_with<F>(&self, caller: UserId, raw_id: &str, decode: F) -> NoteResult<Note>
    where
        F: FnOnce() -> NoteResult<UpdateNoteRequest>,
    {
        let id = parse_note_id(raw_id)?;
        self.load_owned(caller, id).await?;

        let req = decode()?;
        let patch = validate_update(&req).map_err(NoteError::Validation)?;

        // A concurrent delete between the lookup and this write makes the
        // conditional update match nothing.
        let updated = self
            .store
            .update_by_id(id, &patch, caller)
            .await?
            .ok_or_else(|| NoteError::NotFound(id.to_string()))?;

        tracing::debug!(note_id = %id, "Note updated");
        Ok(updated)
    }

    /// Delete a note owned by the caller, returning its prior state
    pub async fn delete_note(&self, caller: UserId, raw_id: &str) -> NoteResult<DeletedNote> {
        let id = parse_note_id(raw_id)?;
        self.load_owned(caller, id).await?;

        let removed = self
            .store
            .delete_by_id(id, caller)
            .await?
            .ok_or_else(|| NoteError::NotFound(id.to_string()))?;

        tracing::info!(note_id = %id, owner = %caller, "Note deleted");
        Ok(DeletedNote::new(removed))
    }

    /// Look a note up and check the caller owns it
    async fn load_owned(&self, caller: UserId, id: NoteId) -> NoteResult<Note> {
        let note = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| NoteError::NotFound(id.to_string()))?;

        if !owns(caller, &note) {
            tracing::warn!(note_id = %id, caller = %caller, "Rejected access to another user's note");
            return Err(NoteError::PermissionDenied);
        }
        Ok(note)
    }
}
