//! JWT bearer token verification.
//!
//! Tokens are HS256-signed JWTs carrying a [`Claims`] payload whose `sub` is
//! the tenant user id.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use quicknotes_core::error::CoreError;
use quicknotes_core::types::UserId;
use serde::{Deserialize, Serialize};

use super::IdentityVerifier;

/// JWT claims expected in every bearer token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user id used as the tenant key.
    pub sub: UserId,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
}

/// Configuration for JWT validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to verify tokens.
    pub secret: String,
}

impl JwtConfig {
    /// Load from `AUTH_JWT_SECRET`. Unset or empty disables bearer tokens.
    pub fn from_env() -> Option<Self> {
        std::env::var("AUTH_JWT_SECRET")
            .ok()
            .filter(|secret| !secret.is_empty())
            .map(|secret| Self { secret })
    }
}

/// Issue an HS256 token for `user_id` valid for `ttl_secs` seconds.
pub fn generate_token(
    user_id: &str,
    ttl_secs: i64,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: now + ttl_secs,
        iat: now,
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode a token, returning the embedded [`Claims`].
///
/// Validates the signature and expiration.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

/// [`IdentityVerifier`] backed by a shared HS256 secret.
pub struct JwtVerifier {
    config: JwtConfig,
}

impl JwtVerifier {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }
}

impl IdentityVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<UserId, CoreError> {
        let claims = validate_token(token, &self.config).map_err(|e| {
            tracing::debug!(error = %e, "Bearer token rejected");
            CoreError::Unauthorized("Invalid token".into())
        })?;
        if claims.sub.trim().is_empty() {
            return Err(CoreError::Unauthorized("Invalid token".into()));
        }
        Ok(claims.sub)
    }
}
