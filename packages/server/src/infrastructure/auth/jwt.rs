//! JWT implementation of the `Authenticator` trait.
//!
//! Verifies HS256 tokens signed with a shared secret by the external token
//! issuer. Expiry is validated by `jsonwebtoken`'s default validation.

use async_trait::async_trait;
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::domain::{AuthError, Authenticator, Identity, UserId, UserName};

/// JWT claims carried in the bearer credential
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// Display name; falls back to `sub` when absent
    #[serde(default)]
    pub name: Option<String>,
    /// Avatar URL
    #[serde(default)]
    pub photo: Option<String>,
    /// Expiration time (Unix timestamp, seconds)
    pub exp: u64,
    /// Issued at time (Unix timestamp, seconds)
    pub iat: u64,
}

/// Shared-secret HS256 token verifier
pub struct JwtAuthenticator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtAuthenticator {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
            validation: Validation::default(),
        }
    }
}

#[async_trait]
impl Authenticator for JwtAuthenticator {
    async fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                tracing::debug!("Token verification failed: {}", e);
                AuthError::InvalidCredential
            })?;
        let claims = token_data.claims;

        let user_id =
            UserId::new(claims.sub.clone()).map_err(|_| AuthError::InvalidCredential)?;
        let name = UserName::new(claims.name.unwrap_or(claims.sub))
            .map_err(|_| AuthError::InvalidCredential)?;

        Ok(Identity::new(user_id, name, claims.photo))
    }
}
