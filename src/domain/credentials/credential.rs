//! Credential entity

use std::fmt;

/// A username and the password hash it authenticates against
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    username: String,
    password_hash: String,
}

impl Credential {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password_hash", &"[hidden]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_hash() {
        let credential = Credential::new("admin", "$argon2id$v=19$secret-material");
        let debug = format!("{:?}", credential);

        assert!(debug.contains("admin"));
        assert!(!debug.contains("secret-material"));
    }
}
