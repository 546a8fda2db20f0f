use chrono::{DateTime, Utc};

/// Credential held by a [`NoteClient`](super::NoteClient).
///
/// A session is active while it holds a token that has not passed its expiry.
/// `clear()` signs out; a cleared or expired session never yields a token.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<String>,
    expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Session with no known expiry
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            expires_at: None,
        }
    }

    pub fn with_expiry(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: Some(token.into()),
            expires_at: Some(expires_at),
        }
    }

    /// Signed-out session
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.token.is_some() && self.expires_at.map_or(true, |exp| Utc::now() < exp)
    }

    /// The token, if the session is still active
    pub fn token(&self) -> Option<&str> {
        if self.is_active() {
            self.token.as_deref()
        } else {
            None
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn clear(&mut self) {
        self.token = None;
        self.expires_at = None;
    }
}
