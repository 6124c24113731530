//! Password login that mints bearer tokens

use chrono::Duration;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::domain::{CredentialStore, DomainError};
use crate::infrastructure::user::PasswordHasher;

use super::jwt::JwtGenerator;

/// Lifetime of tokens minted by a password login
pub const DEFAULT_LOGIN_TTL_MINUTES: i64 = 30;

/// Response body of a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: String,
    /// Seconds until the token expires
    pub expires_in: i64,
}

impl IssuedToken {
    pub fn bearer(access_token: String, ttl: Duration) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            expires_in: ttl.num_seconds(),
        }
    }
}

/// Verifies a username/password pair and signs a token for it.
///
/// Unknown usernames still pay for one hash verification against a
/// throwaway hash, so both rejection paths cost about the same.
pub struct TokenIssuer {
    credentials: Arc<dyn CredentialStore>,
    hasher: Arc<dyn PasswordHasher>,
    jwt: Arc<dyn JwtGenerator>,
    login_ttl: Duration,
    dummy_hash: String,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("jwt", &self.jwt)
            .field("login_ttl", &self.login_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        hasher: Arc<dyn PasswordHasher>,
        jwt: Arc<dyn JwtGenerator>,
        login_ttl: Duration,
    ) -> Result<Self, DomainError> {
        let dummy_hash = hasher.hash("dummy-password-for-unknown-users")?;

        Ok(Self {
            credentials,
            hasher,
            jwt,
            login_ttl,
            dummy_hash,
        })
    }

    pub async fn issue(&self, username: &str, password: &str) -> Result<IssuedToken, DomainError> {
        let Some(credential) = self.credentials.find(username).await? else {
            let _ = self.hasher.verify(password, &self.dummy_hash);
            tracing::info!(username = %username, "Login rejected: unknown user");
            return Err(DomainError::InvalidCredentials);
        };

        if !self.hasher.verify(password, credential.password_hash()) {
            tracing::info!(username = %username, "Login rejected: wrong password");
            return Err(DomainError::InvalidCredentials);
        }

        let token = self.jwt.generate(credential.username(), Some(self.login_ttl))?;

        tracing::debug!(username = %username, "Issued access token");
        Ok(IssuedToken::bearer(token, self.login_ttl))
    }
}
