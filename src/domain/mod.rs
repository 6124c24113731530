//! Domain layer - Core entities, repository traits and errors

pub mod cache;
pub mod cart;
pub mod credentials;
pub mod error;
pub mod product;
pub mod user;

pub use cache::{user_cache_key, Cache, CacheExt};
pub use cart::{Cart, CartId, CartItem, CartLine, CartRepository, StoredCart};
pub use credentials::{Credential, CredentialStore};
pub use error::{DomainError, ErrorKind};
pub use product::{NewProduct, Product, ProductId, ProductRepository};
pub use user::{NewUser, UserId, UserIdentity, UserRepository};
