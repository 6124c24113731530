//! User infrastructure module
//!
//! Argon2 password hashing, the in-memory and PostgreSQL user repositories,
//! the cache-aside decorator over either of them, and the user service.

mod cached_repository;
mod password;
mod postgres_repository;
mod repository;
mod service;

pub use cached_repository::{CachedUserRepository, DEFAULT_USER_TTL};
pub use password::{Argon2Hasher, PasswordHasher};
pub use postgres_repository::PostgresUserRepository;
pub use repository::InMemoryUserRepository;
pub use service::{CreateUserRequest, UpdateUserRequest, UserService};
