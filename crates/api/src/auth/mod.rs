//! Identity verification.
//!
//! The tenant key normally arrives in the `x-user-id` header. When a verifier
//! is configured, a bearer token takes precedence and the verified subject
//! becomes the user id.
//!
//! - [`jwt`] -- HS256 JWT verifier and token issuing helper.

use quicknotes_core::error::CoreError;
use quicknotes_core::types::UserId;

pub mod jwt;

/// Turns a bearer token into a user id.
pub trait IdentityVerifier: Send + Sync {
    /// Verify `token` and return the user id it was issued for.
    fn verify(&self, token: &str) -> Result<UserId, CoreError>;
}
