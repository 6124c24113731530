//! Cache-aside decorator over a user repository

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::cache::{user_cache_key, Cache, CacheExt};
use crate::domain::user::{NewUser, UserId, UserIdentity, UserRepository};
use crate::domain::DomainError;

/// Default lifetime of a cached user identity
pub const DEFAULT_USER_TTL: Duration = Duration::from_secs(3600);

/// User repository wrapper that serves username lookups from a cache.
///
/// Reads populate the cache on a miss. Writes go to the inner repository
/// first and then delete the username's entry; entries are never updated in
/// place. Cache failures never fail the caller: a broken read is a miss and a
/// broken delete or warm is logged.
#[derive(Debug)]
pub struct CachedUserRepository {
    inner: Arc<dyn UserRepository>,
    cache: Arc<dyn Cache>,
    ttl: Duration,
}

impl CachedUserRepository {
    pub fn new(inner: Arc<dyn UserRepository>, cache: Arc<dyn Cache>) -> Self {
        Self::with_ttl(inner, cache, DEFAULT_USER_TTL)
    }

    pub fn with_ttl(inner: Arc<dyn UserRepository>, cache: Arc<dyn Cache>, ttl: Duration) -> Self {
        Self { inner, cache, ttl }
    }

    /// Drop the cached entry for a username
    pub async fn invalidate(&self, username: &str) {
        let key = user_cache_key(username);

        if let Err(e) = self.cache.delete(&key).await {
            tracing::warn!(
                username = %username,
                error = %e,
                "Failed to invalidate cached user; entry stays until it expires"
            );
        }
    }

    /// Populate the cache with the given identities, returning how many were stored
    pub async fn warm(&self, users: &[UserIdentity]) -> usize {
        let mut warmed = 0;

        for user in users {
            if self.store(user).await {
                warmed += 1;
            }
        }

        warmed
    }

    async fn store(&self, user: &UserIdentity) -> bool {
        let key = user_cache_key(user.username());

        match self.cache.set(&key, user, self.ttl).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(username = %user.username(), error = %e, "Failed to cache user");
                false
            }
        }
    }
}

#[async_trait]
impl UserRepository for CachedUserRepository {
    async fn get(&self, id: UserId) -> Result<Option<UserIdentity>, DomainError> {
        self.inner.get(id).await
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<UserIdentity>, DomainError> {
        let key = user_cache_key(username);

        match self.cache.get::<UserIdentity>(&key).await {
            Ok(Some(user)) => {
                tracing::debug!(username = %username, "Cache hit for user");
                return Ok(Some(user));
            }
            Ok(None) => {
                tracing::debug!(username = %username, "Cache miss, reading user repository");
            }
            Err(e) => {
                tracing::warn!(
                    username = %username,
                    error = %e,
                    "Cache read failed, falling back to user repository"
                );
            }
        }

        let user = self.inner.get_by_username(username).await?;

        if let Some(user) = &user {
            self.store(user).await;
        }

        Ok(user)
    }

    async fn create(&self, user: NewUser) -> Result<UserIdentity, DomainError> {
        let created = self.inner.create(user).await?;
        self.invalidate(created.username()).await;
        Ok(created)
    }

    async fn update(&self, user: &UserIdentity) -> Result<UserIdentity, DomainError> {
        let updated = self.inner.update(user).await?;
        self.invalidate(updated.username()).await;
        Ok(updated)
    }

    async fn search_by_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Vec<UserIdentity>, DomainError> {
        let users = self.inner.search_by_name(first_name, last_name).await?;
        let warmed = self.warm(&users).await;

        tracing::debug!(matches = users.len(), warmed, "Warmed cache from user search");

        Ok(users)
    }
}
