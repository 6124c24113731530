//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{NewUser, UserId, UserIdentity, UserRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct UserTable {
    rows: BTreeMap<i64, UserIdentity>,
    /// username -> id
    username_index: HashMap<String, i64>,
    last_id: i64,
}

impl UserTable {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.rows
            .values()
            .any(|u| u.email() == email && Some(u.id().value()) != except)
    }
}

/// In-memory implementation of UserRepository.
///
/// Ids are assigned from a counter starting at 1 and are never reused.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    table: Arc<RwLock<UserTable>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: UserId) -> Result<Option<UserIdentity>, DomainError> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id.value()).cloned())
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<UserIdentity>, DomainError> {
        let table = self.table.read().await;

        Ok(table
            .username_index
            .get(username)
            .and_then(|id| table.rows.get(id))
            .cloned())
    }

    async fn create(&self, user: NewUser) -> Result<UserIdentity, DomainError> {
        let mut table = self.table.write().await;

        if table.username_index.contains_key(&user.username) {
            return Err(DomainError::already_exists(format!(
                "Username '{}' already exists",
                user.username
            )));
        }

        if table.email_taken(&user.email, None) {
            return Err(DomainError::already_exists("Email is already registered"));
        }

        table.last_id += 1;
        let id = table.last_id;
        let created = UserIdentity::from_new(UserId::new(id), user);

        table
            .username_index
            .insert(created.username().to_string(), id);
        table.rows.insert(id, created.clone());

        Ok(created)
    }

    async fn update(&self, user: &UserIdentity) -> Result<UserIdentity, DomainError> {
        let mut table = self.table.write().await;
        let id = user.id().value();

        let Some(old_username) = table.rows.get(&id).map(|u| u.username().to_string()) else {
            return Err(DomainError::not_found(format!("User '{}' not found", id)));
        };

        let renamed = old_username != user.username();

        if renamed && table.username_index.contains_key(user.username()) {
            return Err(DomainError::already_exists(format!(
                "Username '{}' already exists",
                user.username()
            )));
        }

        if table.email_taken(user.email(), Some(id)) {
            return Err(DomainError::already_exists("Email is already registered"));
        }

        if renamed {
            table.username_index.remove(&old_username);
            table.username_index.insert(user.username().to_string(), id);
        }
        table.rows.insert(id, user.clone());
        Ok(user.clone())
    }

    async fn search_by_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Vec<UserIdentity>, DomainError> {
        let table = self.table.read().await;

        Ok(table
            .rows
            .values()
            .filter(|u| u.matches_name(first_name, last_name))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str, first: &str, last: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            password_hash: "$argon2id$hash".to_string(),
            email: format!("{}@example.com", username),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let repo = InMemoryUserRepository::new();

        let alice = repo.create(new_user("alice", "Alice", "Smith")).await.unwrap();
        let bob = repo.create(new_user("bob", "Bob", "Jones")).await.unwrap();

        assert_eq!(alice.id(), UserId::new(1));
        assert_eq!(bob.id(), UserId::new(2));
        assert_eq!(repo.get(UserId::new(2)).await.unwrap(), Some(bob));
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("alice", "Alice", "Smith")).await.unwrap();

        let mut again = new_user("alice", "Other", "Person");
        again.email = "other@example.com".to_string();
        let err = repo.create(again).await.unwrap_err();

        assert!(matches!(err, DomainError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("alice", "Alice", "Smith")).await.unwrap();

        let mut clash = new_user("alice2", "Alice", "Smith");
        clash.email = "alice@example.com".to_string();
        let err = repo.create(clash).await.unwrap_err();

        assert!(matches!(err, DomainError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_get_by_username() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("alice", "Alice", "Smith")).await.unwrap();

        let found = repo.get_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.first_name(), "Alice");
        assert!(repo.get_by_username("Alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let repo = InMemoryUserRepository::new();
        let mut alice = repo.create(new_user("alice", "Alice", "Smith")).await.unwrap();

        alice.set_last_name("Brown");
        repo.update(&alice).await.unwrap();

        let stored = repo.get_by_username("alice").await.unwrap().unwrap();
        assert_eq!(stored.last_name(), "Brown");
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let repo = InMemoryUserRepository::new();
        let ghost = UserIdentity::new(UserId::new(42), "ghost", "G", "H", "x", "g@example.com");

        let err = repo.update(&ghost).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_rejected_rename_keeps_lookups() {
        let repo = InMemoryUserRepository::new();
        let alice = repo.create(new_user("alice", "Alice", "Smith")).await.unwrap();
        repo.create(new_user("bob", "Bob", "Jones")).await.unwrap();

        let renamed = UserIdentity::new(
            alice.id(),
            "carol",
            "Alice",
            "Smith",
            "$argon2id$hash",
            "bob@example.com",
        );
        let err = repo.update(&renamed).await.unwrap_err();
        assert!(matches!(err, DomainError::AlreadyExists { .. }));

        let stored = repo.get_by_username("alice").await.unwrap().unwrap();
        assert_eq!(stored.id(), alice.id());
        assert!(repo.get_by_username("carol").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rename_moves_lookup() {
        let repo = InMemoryUserRepository::new();
        let alice = repo.create(new_user("alice", "Alice", "Smith")).await.unwrap();

        let renamed = UserIdentity::new(
            alice.id(),
            "carol",
            "Alice",
            "Smith",
            "$argon2id$hash",
            "alice@example.com",
        );
        repo.update(&renamed).await.unwrap();

        assert!(repo.get_by_username("alice").await.unwrap().is_none());
        assert_eq!(
            repo.get_by_username("carol").await.unwrap().unwrap().id(),
            alice.id()
        );
    }

    #[tokio::test]
    async fn test_search_by_name() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("ivan", "Ivan", "Ivanov")).await.unwrap();
        repo.create(new_user("petr", "Petr", "Petrov")).await.unwrap();

        let found = repo.search_by_name("iva", "ano").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].username(), "ivan");

        assert!(repo.search_by_name("iva", "petr").await.unwrap().is_empty());
    }
}
