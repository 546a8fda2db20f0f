//! Test helper factories and mock state builders
//!
//! Provides convenience functions for creating test objects with sensible defaults,
//! and helpers for building mock server state.

use crate::api::handlers::{SharedState, ServerState};
use crate::auth::jwt::encode_jwt;
use crate::auth::JwtVerifier;
use crate::notes::{
    CreateNoteRequest, NewNote, Note, NoteId, NoteManager, NotePatch, Priority, UserId,
};
use crate::store::{MemoryNoteStore, NoteStore};
use crate::AuthConfig;
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

pub const TEST_SECRET: &str = "test-secret-key-minimum-32-chars!!";

// ============================================================================
// Mock state builders
// ============================================================================

/// Test AuthConfig with a fixed secret
pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: TEST_SECRET.to_string(),
        jwt_expiry_secs: 3600,
    }
}

/// Server state over the given store. `None` auth means deny-by-default.
pub fn server_state_with(
    store: Arc<dyn NoteStore>,
    auth_config: Option<AuthConfig>,
) -> SharedState {
    let verifier = auth_config
        .as_ref()
        .map(|c| Arc::new(JwtVerifier::new(&c.jwt_secret)) as Arc<dyn crate::auth::IdentityVerifier>);
    Arc::new(ServerState {
        notes: Arc::new(NoteManager::new(store)),
        verifier,
    })
}

/// Server state over an empty in-memory store, with auth configured
pub fn mock_server_state() -> (SharedState, Arc<MemoryNoteStore>) {
    let store = Arc::new(MemoryNoteStore::new());
    let state = server_state_with(store.clone(), Some(test_auth_config()));
    (state, store)
}

/// `Authorization` header value for the given user
pub fn bearer_for(user: UserId) -> String {
    let token = encode_jwt(user, TEST_SECRET, 3600).expect("test token encoding should succeed");
    format!("Bearer {}", token)
}

// ============================================================================
// Test data factories
// ============================================================================

pub fn create_request(title: &str, description: &str, priority: &str) -> CreateNoteRequest {
    CreateNoteRequest {
        title: title.to_string(),
        description: description.to_string(),
        priority: priority.to_string(),
    }
}

pub fn test_note(owner: UserId) -> Note {
    Note {
        id: NoteId::new(),
        owner,
        title: "Test note".to_string(),
        description: "A note used in tests".to_string(),
        priority: Priority::Med,
        created_at: Utc::now(),
        updated_at: None,
    }
}

// ============================================================================
// Store doubles
// ============================================================================

/// Store whose note disappears between the lookup and the write, as if a
/// concurrent delete had won the race.
pub struct DeleteBeforeWriteStore {
    pub inner: MemoryNoteStore,
}

impl DeleteBeforeWriteStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryNoteStore::new(),
        }
    }
}

#[async_trait]
impl NoteStore for DeleteBeforeWriteStore {
    async fn insert(&self, note: NewNote) -> Result<Note> {
        self.inner.insert(note).await
    }

    async fn find_by_id(&self, id: NoteId) -> Result<Option<Note>> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_owner(&self, owner: UserId) -> Result<Vec<Note>> {
        self.inner.find_by_owner(owner).await
    }

    async fn update_by_id(
        &self,
        id: NoteId,
        patch: &NotePatch,
        expected_owner: UserId,
    ) -> Result<Option<Note>> {
        self.inner.delete_by_id(id, expected_owner).await?;
        self.inner.update_by_id(id, patch, expected_owner).await
    }

    async fn delete_by_id(&self, id: NoteId, expected_owner: UserId) -> Result<Option<Note>> {
        self.inner.delete_by_id(id, expected_owner).await?;
        self.inner.delete_by_id(id, expected_owner).await
    }

    async fn health_check(&self) -> Result<bool> {
        self.inner.health_check().await
    }
}
