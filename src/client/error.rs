use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// No active session: never signed in, cleared, or expired
    #[error("not signed in")]
    NoSession,

    /// The server rejected the credential; the session has been cleared
    #[error("session rejected by server: {0}")]
    Unauthenticated(String),

    /// The server rejected the note payload
    #[error("validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// Any other non-success response
    #[error("HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
