//! Credential store trait

use async_trait::async_trait;

use super::credential::Credential;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Lookup of the password hash a username authenticates against
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Finds the credential for a username; `None` when it is not provisioned
    async fn find(&self, username: &str) -> Result<Option<Credential>, DomainError>;
}
