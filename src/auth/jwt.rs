//! HS256 bearer tokens whose `sub` claim is the note owner's UUID.

use crate::notes::UserId;
use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn for_user(user_id: UserId, expiry_secs: u64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id.to_string(),
            iat: now,
            exp: now.saturating_add(expiry_secs.min(i64::MAX as u64) as i64),
        }
    }

    /// The user the token was issued for
    pub fn user_id(&self) -> Result<UserId> {
        self.sub
            .parse()
            .with_context(|| format!("token subject is not a user id: {}", self.sub))
    }
}

/// Sign a token for `user_id`, valid for `expiry_secs`
pub fn encode_jwt(user_id: UserId, secret: &str, expiry_secs: u64) -> Result<String> {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &Claims::for_user(user_id, expiry_secs),
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("Failed to sign token")
}

/// Check signature and expiry, returning the claims.
///
/// Expiry is enforced without leeway.
pub fn decode_jwt(token: &str, secret: &str) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .context("Failed to verify token")?;

    Ok(data.claims)
}
