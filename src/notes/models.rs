//! Note models and DTOs
//!
//! A note is a small piece of user-authored text owned by exactly one user.
//! Only the owner may change or delete it.

use super::error::{NoteError, NoteResult};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identity of an authenticated user (the JWT `sub` claim).
pub type UserId = Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Store-assigned note identifier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NoteId(Uuid);

impl NoteId {
    /// Generate a fresh identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for NoteId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for NoteId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<Uuid>()
            .map(Self)
            .map_err(|_| format!("Invalid note id: {}", s))
    }
}

// ============================================================================
// Core Enums
// ============================================================================

/// Priority of a note
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    #[default]
    Low,
    Med,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Med, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Med => "MED",
            Self::High => "HIGH",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsing is exact: `"low"` or `"Medium"` are rejected.
impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW" => Ok(Self::Low),
            "MED" => Ok(Self::Med),
            "HIGH" => Ok(Self::High),
            _ => Err(format!("Unknown priority: {}", s)),
        }
    }
}

// ============================================================================
// Note
// ============================================================================

/// A stored note
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Note {
    pub id: NoteId,
    pub owner: UserId,
    pub title: String,
    pub description: String,
    /// Missing on read means LOW
    #[serde(default)]
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A note that has passed validation but has not been stored yet
#[derive(Debug, Clone)]
pub struct NewNote {
    pub owner: UserId,
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

/// Field changes for an update. `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
}

impl NotePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.priority.is_none()
    }

    /// Apply this patch to a note in place
    pub fn apply_to(&self, note: &mut Note) {
        if let Some(ref title) = self.title {
            note.title = title.clone();
        }
        if let Some(ref description) = self.description {
            note.description = description.clone();
        }
        if let Some(priority) = self.priority {
            note.priority = priority;
        }
    }
}

// ============================================================================
// Request / Response DTOs
// ============================================================================

/// Body of a create request.
///
/// Fields are kept as raw text so that every violation can be reported at
/// once: `null` reads as empty, numbers and booleans as their JSON text, and
/// arrays or objects as empty. Unknown fields (`owner`, `user`, `id`, ...)
/// are dropped by serde.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CreateNoteRequest {
    #[serde(deserialize_with = "lenient_required")]
    pub title: String,
    #[serde(deserialize_with = "lenient_required")]
    pub description: String,
    #[serde(deserialize_with = "lenient_required")]
    pub priority: String,
}

/// Body of an update request. Absent or `null` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct UpdateNoteRequest {
    #[serde(
        deserialize_with = "lenient_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    #[serde(
        deserialize_with = "lenient_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(
        deserialize_with = "lenient_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub priority: Option<String>,
}

fn lenient_optional<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        v @ (Value::Number(_) | Value::Bool(_)) => Some(v.to_string()),
        Value::Array(_) | Value::Object(_) => Some(String::new()),
    })
}

fn lenient_required<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_optional(deserializer).map(Option::unwrap_or_default)
}

/// Decode a request body. An empty body reads as `T::default()`.
pub fn parse_json_body<T>(body: &[u8]) -> NoteResult<T>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| NoteError::InvalidArgument(format!("Malformed JSON body: {}", e)))
}

/// Response of a delete: a confirmation plus the note as it was
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedNote {
    pub result: String,
    pub note: Note,
}

impl DeletedNote {
    pub fn new(note: Note) -> Self {
        Self {
            result: "Previous note has been deleted".to_string(),
            note,
        }
    }
}
