//! Storefront core
//!
//! Backend services for a small online shop:
//! - JWT login and bearer-token identity checks
//! - User accounts in PostgreSQL with a cache-aside layer (Redis or in-process)
//! - A product catalog in MongoDB
//! - Shopping carts joining relational lines with catalog products
//!
//! Every store also has an in-memory implementation, selected through
//! [`config::StorageBackend`].

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod state;

pub use config::AppConfig;
pub use domain::{DomainError, ErrorKind};
pub use state::AppState;
