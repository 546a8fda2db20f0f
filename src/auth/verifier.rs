//! Identity verification: turns a bearer credential into a user id.

use crate::auth::jwt::decode_jwt;
use crate::notes::{NoteError, UserId};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing credential")]
    Missing,
    #[error("invalid credential: {0}")]
    Invalid(String),
}

impl From<AuthError> for NoteError {
    fn from(_: AuthError) -> Self {
        NoteError::Unauthenticated
    }
}

/// Verifies an opaque credential and returns the user it identifies
pub trait IdentityVerifier: Send + Sync {
    fn verify(&self, credential: &str) -> Result<UserId, AuthError>;
}

/// Verifies HS256 JWTs whose `sub` claim is the user UUID
pub struct JwtVerifier {
    secret: String,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.to_string(),
        }
    }
}

impl IdentityVerifier for JwtVerifier {
    fn verify(&self, credential: &str) -> Result<UserId, AuthError> {
        if credential.trim().is_empty() {
            return Err(AuthError::Missing);
        }

        let claims = decode_jwt(credential, &self.secret)
            .map_err(|e| AuthError::Invalid(format!("{:#}", e)))?;

        claims
            .user_id()
            .map_err(|_| AuthError::Invalid("Invalid user ID in token".to_string()))
    }
}
