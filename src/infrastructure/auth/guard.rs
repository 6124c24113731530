//! Bearer-token identity verification

use std::sync::Arc;

use crate::domain::{CredentialStore, DomainError, UserIdentity, UserRepository};

use super::jwt::JwtGenerator;

/// Pull the token out of an `Authorization: Bearer <token>` header value.
///
/// The scheme is matched case-sensitively; anything else is `Unauthenticated`.
pub fn extract_bearer_token(header: Option<&str>) -> Result<&str, DomainError> {
    let token = header
        .map(str::trim)
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .unwrap_or_default();

    if token.is_empty() {
        return Err(DomainError::Unauthenticated);
    }

    Ok(token)
}

/// Who a verified token belongs to
#[derive(Debug, Clone, PartialEq)]
pub enum Principal {
    /// A record from the user repository
    User(UserIdentity),
    /// An account that exists only in a credential store
    Account(String),
}

impl Principal {
    pub fn username(&self) -> &str {
        match self {
            Self::User(user) => user.username(),
            Self::Account(username) => username,
        }
    }

    /// The full user record, when the subject has one
    pub fn user(&self) -> Option<&UserIdentity> {
        match self {
            Self::User(user) => Some(user),
            Self::Account(_) => None,
        }
    }
}

/// Where token subjects are looked up
#[derive(Clone)]
enum SubjectLookup {
    Users(Arc<dyn UserRepository>),
    Credentials(Arc<dyn CredentialStore>),
}

impl std::fmt::Debug for SubjectLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Users(users) => f.debug_tuple("Users").field(users).finish(),
            Self::Credentials(_) => f.write_str("Credentials"),
        }
    }
}

/// Resolves bearer tokens to the account they were issued for.
///
/// A bad signature, a malformed or expired token, a missing subject and an
/// unknown subject all yield the same `Unauthenticated` error. Store failures
/// during the lookup are passed through unchanged.
#[derive(Debug, Clone)]
pub struct IdentityGuard {
    jwt: Arc<dyn JwtGenerator>,
    lookup: SubjectLookup,
}

impl IdentityGuard {
    /// Guard resolving subjects against user records
    pub fn new(jwt: Arc<dyn JwtGenerator>, users: Arc<dyn UserRepository>) -> Self {
        Self {
            jwt,
            lookup: SubjectLookup::Users(users),
        }
    }

    /// Guard resolving subjects against a credential store only
    pub fn with_credentials(
        jwt: Arc<dyn JwtGenerator>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            jwt,
            lookup: SubjectLookup::Credentials(credentials),
        }
    }

    /// Verify the token and return its subject without touching any store
    pub fn verify_subject(&self, token: &str) -> Result<String, DomainError> {
        let claims = self.jwt.validate(token)?;
        claims
            .subject()
            .map(str::to_string)
            .ok_or(DomainError::Unauthenticated)
    }

    pub async fn resolve(&self, token: &str) -> Result<Principal, DomainError> {
        let username = self.verify_subject(token)?;

        let principal = match &self.lookup {
            SubjectLookup::Users(users) => {
                users.get_by_username(&username).await?.map(Principal::User)
            }
            SubjectLookup::Credentials(credentials) => credentials
                .find(&username)
                .await?
                .map(|credential| Principal::Account(credential.username().to_string())),
        };

        principal.ok_or_else(|| {
            tracing::debug!(username = %username, "Token subject is not provisioned");
            DomainError::Unauthenticated
        })
    }

    /// Extract the bearer token from a header value and resolve it
    pub async fn authenticate(&self, header: Option<&str>) -> Result<Principal, DomainError> {
        let token = extract_bearer_token(header)?;
        self.resolve(token).await
    }
}
