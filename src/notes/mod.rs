//! Notes module
//!
//! User-owned notes: the data model, payload validation, and the
//! ownership-checked operations the HTTP API exposes.

pub mod error;
pub mod manager;
pub mod models;
pub mod validation;

pub use error::{NoteError, NoteResult};
pub use manager::{owns, parse_note_id, NoteManager};
pub use models::*;
pub use validation::{Schema, Violation};
