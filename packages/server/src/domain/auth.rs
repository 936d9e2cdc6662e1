//! Credential verification trait.

use async_trait::async_trait;

use super::entity::Identity;
use super::error::AuthError;

/// Verifies the bearer credential presented on the connection upgrade.
///
/// Verification happens before any room state is created: an
/// unauthenticated socket never enters the registry.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Verify a credential and return the identity it asserts
    async fn verify(&self, token: &str) -> Result<Identity, AuthError>;
}
