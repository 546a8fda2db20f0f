//! In-memory implementation of NoteStore.
//!
//! Backed by `tokio::sync::RwLock<HashMap<..>>`. Each conditional write holds
//! the write lock across its existence/owner check and the mutation, so the
//! check and the write are atomic with respect to other requests.

use crate::notes::{NewNote, Note, NoteId, NotePatch, UserId};
use crate::store::traits::NoteStore;
use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::RwLock;

/// A stored note plus its insertion sequence number (for stable ordering)
#[derive(Debug, Clone)]
struct Entry {
    seq: u64,
    note: Note,
}

/// Process-local note store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryNoteStore {
    notes: RwLock<HashMap<NoteId, Entry>>,
    next_seq: AtomicU64,
    offline: AtomicBool,
}

impl MemoryNoteStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a lost backend connection: while offline every call fails.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of stored notes, across all owners
    pub async fn len(&self) -> usize {
        self.notes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.notes.read().await.is_empty()
    }

    fn ensure_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            bail!("memory store is offline");
        }
        Ok(())
    }
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    async fn insert(&self, new: NewNote) -> Result<Note> {
        self.ensure_online()?;
        let note = Note {
            id: NoteId::new(),
            owner: new.owner,
            title: new.title,
            description: new.description,
            priority: new.priority,
            created_at: Utc::now(),
            updated_at: None,
        };
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        self.notes.write().await.insert(
            note.id,
            Entry {
                seq,
                note: note.clone(),
            },
        );
        Ok(note)
    }

    async fn find_by_id(&self, id: NoteId) -> Result<Option<Note>> {
        self.ensure_online()?;
        Ok(self.notes.read().await.get(&id).map(|e| e.note.clone()))
    }

    async fn find_by_owner(&self, owner: UserId) -> Result<Vec<Note>> {
        self.ensure_online()?;
        let notes = self.notes.read().await;
        let mut owned: Vec<&Entry> = notes.values().filter(|e| e.note.owner == owner).collect();
        owned.sort_by_key(|e| e.seq);
        Ok(owned.into_iter().map(|e| e.note.clone()).collect())
    }

    async fn update_by_id(
        &self,
        id: NoteId,
        patch: &NotePatch,
        expected_owner: UserId,
    ) -> Result<Option<Note>> {
        self.ensure_online()?;
        let mut notes = self.notes.write().await;
        match notes.get_mut(&id) {
            Some(entry) if entry.note.owner == expected_owner => {
                patch.apply_to(&mut entry.note);
                entry.note.updated_at = Some(Utc::now());
                Ok(Some(entry.note.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_by_id(&self, id: NoteId, expected_owner: UserId) -> Result<Option<Note>> {
        self.ensure_online()?;
        let mut notes = self.notes.write().await;
        let owned = notes
            .get(&id)
            .is_some_and(|e| e.note.owner == expected_owner);
        if owned {
            Ok(notes.remove(&id).map(|e| e.note))
        } else {
            Ok(None)
        }
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(!self.offline.load(Ordering::SeqCst))
    }
}
