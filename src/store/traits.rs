//! NoteStore trait definition
//!
//! Defines the abstract interface to the note collection. The service layer
//! only talks to this trait, so backends can be swapped (in-memory, Neo4j)
//! and tests can run without a database.

use crate::notes::{NewNote, Note, NoteId, NotePatch, UserId};
use anyhow::Result;
use async_trait::async_trait;

/// Abstract interface for note persistence.
///
/// `update_by_id` and `delete_by_id` are conditional: they only touch a record
/// that still exists *and* is owned by `expected_owner`, and return `None`
/// otherwise. This is what keeps a check-then-act update from resurrecting a
/// note that was deleted in between.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Persist a new note, assigning its id and timestamps
    async fn insert(&self, note: NewNote) -> Result<Note>;

    /// Get a note by ID
    async fn find_by_id(&self, id: NoteId) -> Result<Option<Note>>;

    /// All notes owned by `owner`, oldest first
    async fn find_by_owner(&self, owner: UserId) -> Result<Vec<Note>>;

    /// Apply `patch` if the note exists and belongs to `expected_owner`
    async fn update_by_id(
        &self,
        id: NoteId,
        patch: &NotePatch,
        expected_owner: UserId,
    ) -> Result<Option<Note>>;

    /// Remove the note if it exists and belongs to `expected_owner`,
    /// returning its last state
    async fn delete_by_id(&self, id: NoteId, expected_owner: UserId) -> Result<Option<Note>>;

    /// Whether the backend is reachable
    async fn health_check(&self) -> Result<bool>;
}
