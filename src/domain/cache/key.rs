//! Cache key layout

/// Namespace for cached user identities
pub const USER_KEY_NAMESPACE: &str = "user";

/// Key under which a user identity is cached
pub fn user_cache_key(username: &str) -> String {
    format!("{}:{}", USER_KEY_NAMESPACE, username)
}
