//! Cache domain - Generic caching abstraction layer

mod key;
mod repository;

pub use key::{user_cache_key, USER_KEY_NAMESPACE};
pub use repository::{Cache, CacheExt};

#[cfg(test)]
pub use repository::mock::MockCache;
