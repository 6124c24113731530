//! Credential store over a fixed, startup-provisioned map

use async_trait::async_trait;
use std::collections::HashMap;

use crate::domain::{Credential, CredentialStore, DomainError};
use crate::infrastructure::user::PasswordHasher;

/// Fixed username -> hash map, provisioned once at startup
#[derive(Debug, Default)]
pub struct StaticCredentialStore {
    credentials: HashMap<String, Credential>,
}

impl StaticCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credentials
            .insert(credential.username().to_string(), credential);
        self
    }

    /// A store holding a single `admin` account with the given password
    pub fn with_admin(hasher: &dyn PasswordHasher, password: &str) -> Result<Self, DomainError> {
        let hash = hasher.hash(password)?;
        Ok(Self::new().with_credential(Credential::new("admin", hash)))
    }
}

#[async_trait]
impl CredentialStore for StaticCredentialStore {
    async fn find(&self, username: &str) -> Result<Option<Credential>, DomainError> {
        Ok(self.credentials.get(username).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::user::Argon2Hasher;

    #[tokio::test]
    async fn test_with_admin() {
        let hasher = Argon2Hasher::new();
        let store = StaticCredentialStore::with_admin(&hasher, "secret").unwrap();

        let admin = store.find("admin").await.unwrap().unwrap();
        assert!(hasher.verify("secret", admin.password_hash()));
        assert!(store.find("root").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_username() {
        let store = StaticCredentialStore::new().with_credential(Credential::new("bob", "hash"));

        assert!(store.find("alice").await.unwrap().is_none());
        assert!(store.find("bob").await.unwrap().is_some());
    }
}
