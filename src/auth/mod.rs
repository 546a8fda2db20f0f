//! Authentication module: JWT identity verification
//!
//! Provides:
//! - JWT token encoding/decoding (`jwt` submodule)
//! - The `IdentityVerifier` seam and its JWT implementation (`verifier`)
//! - The `require_auth` middleware and `AuthUser` extractor

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod verifier;

pub use extractor::AuthUser;
pub use verifier::{AuthError, IdentityVerifier, JwtVerifier};
