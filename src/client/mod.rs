//! HTTP client for the note API.
//!
//! [`NoteClient`] wraps the four note operations and keeps a local mirror of
//! the signed-in user's notes, updated from each successful response.

mod error;
mod service;
mod session;

pub use error::ClientError;
pub use service::NoteClient;
pub use session::Session;
