//! Cart repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{CartId, CartLine, StoredCart};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Repository trait for carts and their lines.
///
/// Implementations must hold at most one cart per user; `get_or_create` is
/// expected to lean on a uniqueness constraint rather than a read-then-write.
#[async_trait]
pub trait CartRepository: Send + Sync + Debug {
    /// Fetch a user's cart with its lines in insertion order
    async fn find_by_user(&self, user_id: UserId) -> Result<Option<StoredCart>, DomainError>;

    /// Return the user's cart id, creating the cart if it does not exist
    async fn get_or_create(&self, user_id: UserId) -> Result<CartId, DomainError>;

    /// Append a line. Lines are never merged.
    async fn append_line(&self, cart_id: CartId, line: CartLine) -> Result<(), DomainError>;
}
