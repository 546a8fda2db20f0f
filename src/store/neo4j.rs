//! Neo4j-backed NoteStore
//!
//! Notes are stored as `(:Note {id, owner, title, description, priority,
//! created_at, updated_at})` nodes. Conditional writes match on both `id` and
//! `owner`, so a write against a deleted (or foreign) note matches nothing.

use crate::notes::{NewNote, Note, NoteId, NotePatch, Priority, UserId};
use crate::store::traits::NoteStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use neo4rs::{query, Graph, Row};
use std::sync::Arc;

/// Columns returned by every note-reading query
const NOTE_COLUMNS: &str = "n.id AS id, n.owner AS owner, n.title AS title, \
     n.description AS description, n.priority AS priority, \
     n.created_at AS created_at, n.updated_at AS updated_at";

/// Client for note operations on Neo4j
pub struct Neo4jNoteStore {
    graph: Arc<Graph>,
}

impl Neo4jNoteStore {
    /// Connect and make sure the schema exists
    pub async fn new(uri: &str, user: &str, password: &str) -> Result<Self> {
        let graph = Graph::new(uri, user, password)
            .await
            .context("Failed to connect to Neo4j")?;

        let store = Self {
            graph: Arc::new(graph),
        };
        store.init_schema().await;

        Ok(store)
    }

    /// Create the id constraint and the owner index
    async fn init_schema(&self) {
        let statements = [
            "CREATE CONSTRAINT note_id IF NOT EXISTS FOR (n:Note) REQUIRE n.id IS UNIQUE",
            "CREATE INDEX note_owner IF NOT EXISTS FOR (n:Note) ON (n.owner)",
        ];

        for statement in statements {
            if let Err(e) = self.graph.run(query(statement)).await {
                tracing::warn!("Schema statement may already exist: {}", e);
            }
        }
    }

    /// Build a Note from a row produced with [`NOTE_COLUMNS`]
    fn row_to_note(row: &Row) -> Result<Note> {
        let id: String = row.get("id").context("note row without id")?;
        let owner: String = row.get("owner").context("note row without owner")?;
        let priority: Option<String> = row.get("priority").ok();
        let created_at: String = row.get("created_at").context("note row without created_at")?;
        let updated_at: Option<String> = row.get("updated_at").ok();

        Ok(Note {
            id: id.parse().map_err(anyhow::Error::msg)?,
            owner: owner.parse().context("stored owner is not a UUID")?,
            title: row.get("title").unwrap_or_default(),
            description: row.get("description").unwrap_or_default(),
            priority: priority
                .and_then(|p| p.parse::<Priority>().ok())
                .unwrap_or_default(),
            created_at: parse_timestamp(&created_at)?,
            updated_at: updated_at.as_deref().map(parse_timestamp).transpose()?,
        })
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)
        .with_context(|| format!("invalid timestamp: {}", raw))?
        .with_timezone(&Utc))
}

/// SET clauses (and their parameter names) for the fields present in a patch
fn patch_set_clauses(patch: &NotePatch) -> Vec<&'static str> {
    let mut clauses = vec!["n.updated_at = $updated_at"];
    if patch.title.is_some() {
        clauses.push("n.title = $title");
    }
    if patch.description.is_some() {
        clauses.push("n.description = $description");
    }
    if patch.priority.is_some() {
        clauses.push("n.priority = $priority");
    }
    clauses
}

#[async_trait]
impl NoteStore for Neo4jNoteStore {
    async fn insert(&self, new: NewNote) -> Result<Note> {
        let note = Note {
            id: NoteId::new(),
            owner: new.owner,
            title: new.title,
            description: new.description,
            priority: new.priority,
            created_at: Utc::now(),
            updated_at: None,
        };

        let q = query(
            r#"
            CREATE (n:Note {
                id: $id,
                owner: $owner,
                title: $title,
                description: $description,
                priority: $priority,
                created_at: $created_at
            })
            "#,
        )
        .param("id", note.id.to_string())
        .param("owner", note.owner.to_string())
        .param("title", note.title.clone())
        .param("description", note.description.clone())
        .param("priority", note.priority.to_string())
        .param("created_at", note.created_at.to_rfc3339());

        self.graph.run(q).await.context("Failed to create note")?;
        Ok(note)
    }

    async fn find_by_id(&self, id: NoteId) -> Result<Option<Note>> {
        let cypher = format!("MATCH (n:Note {{id: $id}}) RETURN {}", NOTE_COLUMNS);
        let q = query(&cypher).param("id", id.to_string());

        let mut result = self.graph.execute(q).await?;
        match result.next().await? {
            Some(row) => Ok(Some(Self::row_to_note(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_owner(&self, owner: UserId) -> Result<Vec<Note>> {
        let cypher = format!(
            "MATCH (n:Note {{owner: $owner}}) RETURN {} ORDER BY n.created_at, n.id",
            NOTE_COLUMNS
        );
        let q = query(&cypher).param("owner", owner.to_string());

        let mut result = self.graph.execute(q).await?;
        let mut notes = Vec::new();
        while let Some(row) = result.next().await? {
            notes.push(Self::row_to_note(&row)?);
        }
        Ok(notes)
    }

    async fn update_by_id(
        &self,
        id: NoteId,
        patch: &NotePatch,
        expected_owner: UserId,
    ) -> Result<Option<Note>> {
        let cypher = format!(
            "MATCH (n:Note {{id: $id, owner: $owner}}) SET {} RETURN {}",
            patch_set_clauses(patch).join(", "),
            NOTE_COLUMNS
        );

        let mut q = query(&cypher)
            .param("id", id.to_string())
            .param("owner", expected_owner.to_string())
            .param("updated_at", Utc::now().to_rfc3339());
        if let Some(ref title) = patch.title {
            q = q.param("title", title.clone());
        }
        if let Some(ref description) = patch.description {
            q = q.param("description", description.clone());
        }
        if let Some(priority) = patch.priority {
            q = q.param("priority", priority.to_string());
        }

        let mut result = self.graph.execute(q).await?;
        match result.next().await? {
            Some(row) => Ok(Some(Self::row_to_note(&row)?)),
            None => Ok(None),
        }
    }

    async fn delete_by_id(&self, id: NoteId, expected_owner: UserId) -> Result<Option<Note>> {
        let cypher = format!(
            "MATCH (n:Note {{id: $id, owner: $owner}}) \
             WITH n, {} \
             DETACH DELETE n \
             RETURN id, owner, title, description, priority, created_at, updated_at",
            NOTE_COLUMNS
        );
        let q = query(&cypher)
            .param("id", id.to_string())
            .param("owner", expected_owner.to_string());

        let mut result = self.graph.execute(q).await?;
        match result.next().await? {
            Some(row) => Ok(Some(Self::row_to_note(&row)?)),
            None => Ok(None),
        }
    }

    async fn health_check(&self) -> Result<bool> {
        match self.graph.run(query("RETURN 1")).await {
            Ok(()) => Ok(true),
            Err(e) => {
                tracing::warn!(error = %e, "Neo4j health check failed");
                Ok(false)
            }
        }
    }
}
