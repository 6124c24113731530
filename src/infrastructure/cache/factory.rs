//! Runtime selection of the cache backend

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::config::CacheSettings;
use crate::domain::cache::Cache;
use crate::domain::DomainError;

use super::in_memory::{InMemoryCache, InMemoryCacheConfig};
use super::redis::{RedisCache, RedisCacheConfig};

/// Supported cache backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackend {
    /// In-process cache using moka
    #[default]
    InMemory,
    /// Redis cache
    Redis,
}

impl std::fmt::Display for CacheBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheBackend::InMemory => write!(f, "in_memory"),
            CacheBackend::Redis => write!(f, "redis"),
        }
    }
}

/// Builds the configured cache
#[derive(Debug, Default)]
pub struct CacheFactory;

impl CacheFactory {
    pub fn new() -> Self {
        Self
    }

    /// Creates a cache instance for the given settings.
    ///
    /// The Redis backend connects eagerly so a bad URL fails at startup.
    pub async fn create(&self, settings: &CacheSettings) -> Result<Arc<dyn Cache>, DomainError> {
        match settings.backend {
            CacheBackend::InMemory => Ok(self.create_in_memory(settings)),
            CacheBackend::Redis => {
                let url = settings.redis_url.clone().ok_or_else(|| {
                    DomainError::configuration("cache.redis_url is required for the redis backend")
                })?;

                let mut redis_config = RedisCacheConfig::new(url);
                if let Some(prefix) = &settings.key_prefix {
                    redis_config = redis_config.with_key_prefix(prefix.clone());
                }

                let cache = RedisCache::new(redis_config).await?;
                Ok(Arc::new(cache))
            }
        }
    }

    /// Creates an in-process cache sized from the settings, whatever backend they name
    pub fn create_in_memory(&self, settings: &CacheSettings) -> Arc<dyn Cache> {
        let config = InMemoryCacheConfig::default()
            .with_max_capacity(settings.max_capacity)
            .with_default_ttl(Duration::from_secs(settings.user_ttl_secs.max(1)));

        Arc::new(InMemoryCache::with_config(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::CacheExt;

    #[test]
    fn test_cache_backend_display() {
        assert_eq!(CacheBackend::InMemory.to_string(), "in_memory");
        assert_eq!(CacheBackend::Redis.to_string(), "redis");
    }

    #[tokio::test]
    async fn test_factory_create_in_memory() {
        let cache = CacheFactory::new()
            .create(&CacheSettings::default())
            .await
            .unwrap();

        cache
            .set("user:alice", &"value", Duration::from_secs(60))
            .await
            .unwrap();

        let result: Option<String> = cache.get("user:alice").await.unwrap();
        assert_eq!(result, Some("value".to_string()));
    }

    #[tokio::test]
    async fn test_factory_redis_requires_url() {
        let settings = CacheSettings {
            backend: CacheBackend::Redis,
            redis_url: None,
            ..Default::default()
        };

        let err = CacheFactory::new().create(&settings).await.unwrap_err();
        assert!(matches!(err, DomainError::Configuration { .. }));
    }
}
