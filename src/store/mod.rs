//! Note persistence backends

pub mod memory;
pub mod neo4j;
pub mod traits;

pub use memory::MemoryNoteStore;
pub use neo4j::Neo4jNoteStore;
pub use traits::NoteStore;
