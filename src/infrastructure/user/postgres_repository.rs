//! PostgreSQL user repository implementation
//!
//! Expected schema:
//!
//! ```sql
//! CREATE TABLE users (
//!     id              BIGSERIAL PRIMARY KEY,
//!     username        TEXT NOT NULL UNIQUE,
//!     first_name      TEXT NOT NULL,
//!     last_name       TEXT NOT NULL,
//!     hashed_password TEXT NOT NULL,
//!     email           TEXT NOT NULL UNIQUE
//! );
//! ```

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::user::{NewUser, UserId, UserIdentity, UserRepository};
use crate::domain::DomainError;

const USER_COLUMNS: &str = "id, username, first_name, last_name, hashed_password, email";

/// Row shape of the `users` table
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    first_name: String,
    last_name: String,
    hashed_password: String,
    email: String,
}

impl From<UserRow> for UserIdentity {
    fn from(row: UserRow) -> Self {
        UserIdentity::new(
            UserId::new(row.id),
            row.username,
            row.first_name,
            row.last_name,
            row.hashed_password,
            row.email,
        )
    }
}

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// Escape `%`, `_` and `\` so user input matches literally inside `ILIKE`
fn like_pattern(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len() + 2);
    escaped.push('%');
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get(&self, id: UserId) -> Result<Option<UserIdentity>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        Ok(row.map(UserIdentity::from))
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<UserIdentity>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE username = $1",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user by username: {}", e)))?;

        Ok(row.map(UserIdentity::from))
    }

    async fn create(&self, user: NewUser) -> Result<UserIdentity, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (username, first_name, last_name, hashed_password, email)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.password_hash)
        .bind(&user.email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::already_exists(format!(
                    "User '{}' or its email already exists",
                    user.username
                ))
            } else {
                DomainError::storage(format!("Failed to create user: {}", e))
            }
        })?;

        Ok(row.into())
    }

    async fn update(&self, user: &UserIdentity) -> Result<UserIdentity, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = $2, first_name = $3, last_name = $4,
                hashed_password = $5, email = $6
            WHERE id = $1
            "#,
        )
        .bind(user.id().value())
        .bind(user.username())
        .bind(user.first_name())
        .bind(user.last_name())
        .bind(user.password_hash())
        .bind(user.email())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::already_exists(format!(
                    "User '{}' or its email already exists",
                    user.username()
                ))
            } else {
                DomainError::storage(format!("Failed to update user: {}", e))
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "User '{}' not found",
                user.id()
            )));
        }

        Ok(user.clone())
    }

    async fn search_by_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Vec<UserIdentity>, DomainError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            SELECT {}
            FROM users
            WHERE first_name ILIKE $1 AND last_name ILIKE $2
            ORDER BY id
            "#,
            USER_COLUMNS
        ))
        .bind(like_pattern(first_name))
        .bind(like_pattern(last_name))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to search users: {}", e)))?;

        Ok(rows.into_iter().map(UserIdentity::from).collect())
    }
}
