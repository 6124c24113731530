//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{NewUser, UserId, UserIdentity};
use crate::domain::DomainError;

/// Repository trait for user storage
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Get a user by their ID
    async fn get(&self, id: UserId) -> Result<Option<UserIdentity>, DomainError>;

    /// Get a user by their username
    async fn get_by_username(&self, username: &str) -> Result<Option<UserIdentity>, DomainError>;

    /// Create a new user, returning it with its assigned id.
    ///
    /// Fails with `AlreadyExists` when the username or email is taken.
    async fn create(&self, user: NewUser) -> Result<UserIdentity, DomainError>;

    /// Replace an existing user's mutable fields
    async fn update(&self, user: &UserIdentity) -> Result<UserIdentity, DomainError>;

    /// Case-insensitive substring search on first and last name; both must match
    async fn search_by_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Vec<UserIdentity>, DomainError>;

    /// Check if a username exists
    async fn username_exists(&self, username: &str) -> Result<bool, DomainError> {
        Ok(self.get_by_username(username).await?.is_some())
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// Mock user repository for testing
    #[derive(Debug, Default)]
    pub struct MockUserRepository {
        users: Arc<RwLock<BTreeMap<i64, UserIdentity>>>,
        should_fail: Arc<RwLock<bool>>,
        lookups: AtomicUsize,
    }

    impl MockUserRepository {
        /// Create a new mock repository
        pub fn new() -> Self {
            Self::default()
        }

        /// Set whether operations should fail
        pub async fn set_should_fail(&self, fail: bool) {
            *self.should_fail.write().await = fail;
        }

        /// Number of `get_by_username` calls that reached this repository
        pub fn lookups(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }

        async fn check_should_fail(&self) -> Result<(), DomainError> {
            if *self.should_fail.read().await {
                return Err(DomainError::storage("Mock repository configured to fail"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn get(&self, id: UserId) -> Result<Option<UserIdentity>, DomainError> {
            self.check_should_fail().await?;
            Ok(self.users.read().await.get(&id.value()).cloned())
        }

        async fn get_by_username(
            &self,
            username: &str,
        ) -> Result<Option<UserIdentity>, DomainError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.check_should_fail().await?;
            let users = self.users.read().await;
            Ok(users.values().find(|u| u.username() == username).cloned())
        }

        async fn create(&self, user: NewUser) -> Result<UserIdentity, DomainError> {
            self.check_should_fail().await?;
            let mut users = self.users.write().await;

            if users
                .values()
                .any(|u| u.username() == user.username || u.email() == user.email)
            {
                return Err(DomainError::already_exists("User already exists"));
            }

            let id = users.keys().next_back().map_or(1, |last| last + 1);
            let created = UserIdentity::from_new(UserId::new(id), user);
            users.insert(id, created.clone());
            Ok(created)
        }

        async fn update(&self, user: &UserIdentity) -> Result<UserIdentity, DomainError> {
            self.check_should_fail().await?;
            let mut users = self.users.write().await;

            match users.get_mut(&user.id().value()) {
                Some(existing) => {
                    *existing = user.clone();
                    Ok(user.clone())
                }
                None => Err(DomainError::not_found(format!(
                    "User '{}' not found",
                    user.username()
                ))),
            }
        }

        async fn search_by_name(
            &self,
            first_name: &str,
            last_name: &str,
        ) -> Result<Vec<UserIdentity>, DomainError> {
            self.check_should_fail().await?;
            let users = self.users.read().await;
            Ok(users
                .values()
                .filter(|u| u.matches_name(first_name, last_name))
                .cloned()
                .collect())
        }
    }
}
