//! Credential store projected from user records

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{Credential, CredentialStore, DomainError, UserRepository};

/// Credential store backed by the user repository's stored hashes
#[derive(Debug, Clone)]
pub struct UserCredentialStore {
    users: Arc<dyn UserRepository>,
}

impl UserCredentialStore {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl CredentialStore for UserCredentialStore {
    async fn find(&self, username: &str) -> Result<Option<Credential>, DomainError> {
        let user = self.users.get_by_username(username).await?;
        Ok(user.map(|u| Credential::new(u.username(), u.password_hash())))
    }
}
