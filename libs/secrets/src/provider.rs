//! Trait definition for secret stores

use async_trait::async_trait;

use crate::{AuthStrategy, SecretCollection, SecretSession, SecretsError};

/// A remote secret store the bootstrap can log in to and read from.
///
/// Implement this trait to resolve configuration from another backend.
#[async_trait]
pub trait SecretsProvider: Send + Sync {
    /// Establish a session using the selected strategy.
    ///
    /// Never called with [`AuthStrategy::None`].
    async fn authenticate(&self, strategy: &AuthStrategy) -> Result<SecretSession, SecretsError>;

    /// Read the whole secret collection at `mount`/`path`.
    ///
    /// All-or-nothing: either every value is returned or an error is.
    async fn fetch(
        &self,
        session: SecretSession,
        mount: &str,
        path: &str,
    ) -> Result<SecretCollection, SecretsError>;

    /// Get the provider name (for logging)
    fn name(&self) -> &'static str;
}
