//! User service for registration, lookup and profile updates

use std::sync::Arc;

use crate::domain::user::{
    validate_email, validate_name, validate_password, validate_username, NewUser, UserId,
    UserIdentity, UserRepository,
};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Request for registering a new user
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub email: String,
}

/// Partial update of a user's profile; `None` leaves a field unchanged.
///
/// The username is the cache key and the token subject, so it cannot change.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// User service over any user repository, usually the cache-aside one
#[derive(Debug)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { repository, hasher }
    }

    /// Register a new user, hashing the plaintext password
    pub async fn create(&self, request: CreateUserRequest) -> Result<UserIdentity, DomainError> {
        validate_username(&request.username).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_name("First name", &request.first_name)
            .map_err(|e| DomainError::validation(e.to_string()))?;
        validate_name("Last name", &request.last_name)
            .map_err(|e| DomainError::validation(e.to_string()))?;
        validate_email(&request.email).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_password(&request.password).map_err(|e| DomainError::validation(e.to_string()))?;

        if self.repository.username_exists(&request.username).await? {
            return Err(DomainError::already_exists(format!(
                "User '{}' already exists",
                request.username
            )));
        }

        let password_hash = self.hasher.hash(&request.password)?;

        let user = self
            .repository
            .create(NewUser {
                username: request.username,
                first_name: request.first_name,
                last_name: request.last_name,
                password_hash,
                email: request.email,
            })
            .await?;

        tracing::info!(user_id = %user.id(), username = %user.username(), "User registered");
        Ok(user)
    }

    /// Get a user by username
    pub async fn get_by_username(&self, username: &str) -> Result<UserIdentity, DomainError> {
        self.repository
            .get_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", username)))
    }

    /// Users whose first and last names contain the given fragments
    pub async fn search(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Vec<UserIdentity>, DomainError> {
        self.repository.search_by_name(first_name, last_name).await
    }

    /// Apply a partial update to the user with the given id.
    ///
    /// The record is read fresh from the repository, never from the cache.
    pub async fn update(
        &self,
        id: UserId,
        request: UpdateUserRequest,
    ) -> Result<UserIdentity, DomainError> {
        let mut user = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;

        if let Some(first_name) = request.first_name {
            validate_name("First name", &first_name)
                .map_err(|e| DomainError::validation(e.to_string()))?;
            user.set_first_name(first_name);
        }

        if let Some(last_name) = request.last_name {
            validate_name("Last name", &last_name)
                .map_err(|e| DomainError::validation(e.to_string()))?;
            user.set_last_name(last_name);
        }

        if let Some(email) = request.email {
            validate_email(&email).map_err(|e| DomainError::validation(e.to_string()))?;
            user.set_email(email);
        }

        if let Some(password) = request.password {
            validate_password(&password).map_err(|e| DomainError::validation(e.to_string()))?;
            user.set_password_hash(self.hasher.hash(&password)?);
        }

        self.repository.update(&user).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::user::password::Argon2Hasher;
    use crate::infrastructure::user::repository::InMemoryUserRepository;

    fn create_service() -> UserService {
        UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(Argon2Hasher::new()),
        )
    }

    fn make_request(username: &str, password: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            first_name: "Ivan".to_string(),
            last_name: "Ivanov".to_string(),
            password: password.to_string(),
            email: format!("{}@example.com", username),
        }
    }

    #[tokio::test]
    async fn test_create_user_hashes_password() {
        let service = create_service();

        let user = service.create(make_request("alice", "qwerty")).await.unwrap();

        assert_eq!(user.username(), "alice");
        assert_ne!(user.password_hash(), "qwerty");
        assert!(Argon2Hasher::new().verify("qwerty", user.password_hash()));
    }

    #[tokio::test]
    async fn test_register_twice_already_exists() {
        let service = create_service();
        service.create(make_request("alice", "qwerty")).await.unwrap();

        let mut again = make_request("alice", "secret1");
        again.email = "alice2@example.com".to_string();
        let err = service.create(again).await.unwrap_err();

        assert!(matches!(err, DomainError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_create_user_validation() {
        let service = create_service();

        let short_name = service.create(make_request("ab", "qwerty")).await;
        assert!(matches!(short_name, Err(DomainError::Validation { .. })));

        let short_password = service.create(make_request("alice", "abc")).await;
        assert!(matches!(short_password, Err(DomainError::Validation { .. })));

        let mut bad_email = make_request("alice", "qwerty");
        bad_email.email = "not-an-email".to_string();
        assert!(matches!(
            service.create(bad_email).await,
            Err(DomainError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_get_by_username_not_found() {
        let service = create_service();

        let err = service.get_by_username("ghost").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_search() {
        let service = create_service();
        service.create(make_request("ivan", "qwerty")).await.unwrap();

        let found = service.search("IVA", "nov").await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_update_partial() {
        let service = create_service();
        let user = service.create(make_request("ivan", "qwerty")).await.unwrap();

        let updated = service
            .update(
                user.id(),
                UpdateUserRequest {
                    last_name: Some("Petrov".to_string()),
                    password: Some("new-secret".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.first_name(), "Ivan");
        assert_eq!(updated.last_name(), "Petrov");
        assert!(Argon2Hasher::new().verify("new-secret", updated.password_hash()));
        assert_eq!(
            service.get_by_username("ivan").await.unwrap().last_name(),
            "Petrov"
        );
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let service = create_service();

        let err = service
            .update(UserId::new(404), UpdateUserRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_email() {
        let service = create_service();
        let user = service.create(make_request("ivan", "qwerty")).await.unwrap();

        let err = service
            .update(
                user.id(),
                UpdateUserRequest {
                    email: Some("broken".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }
}
