//! Errors produced by note operations

use super::validation::Violation;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NoteError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("validation failed: {}", join_messages(.0))]
    Validation(Vec<Violation>),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("note {0} not found")]
    NotFound(String),

    #[error("not allowed")]
    PermissionDenied,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

fn join_messages(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type NoteResult<T> = std::result::Result<T, NoteError>;
