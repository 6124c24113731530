//! In-memory cart repository

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{CartId, CartLine, CartRepository, DomainError, StoredCart, UserId};

#[derive(Debug, Default)]
struct CartTable {
    carts: BTreeMap<i64, StoredCart>,
    /// user id -> cart id; at most one cart per user
    by_user: HashMap<i64, i64>,
    last_id: i64,
}

/// In-memory implementation of CartRepository.
///
/// The write lock makes `get_or_create` atomic the way a unique index on
/// `user_id` would.
#[derive(Debug, Default)]
pub struct InMemoryCartRepository {
    table: Arc<RwLock<CartTable>>,
}

impl InMemoryCartRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn cart_count(&self) -> usize {
        self.table.read().await.carts.len()
    }
}

#[async_trait]
impl CartRepository for InMemoryCartRepository {
    async fn find_by_user(&self, user_id: UserId) -> Result<Option<StoredCart>, DomainError> {
        let table = self.table.read().await;

        Ok(table
            .by_user
            .get(&user_id.value())
            .and_then(|cart_id| table.carts.get(cart_id))
            .cloned())
    }

    async fn get_or_create(&self, user_id: UserId) -> Result<CartId, DomainError> {
        let mut table = self.table.write().await;

        if let Some(cart_id) = table.by_user.get(&user_id.value()) {
            return Ok(CartId::new(*cart_id));
        }

        table.last_id += 1;
        let id = table.last_id;
        table.by_user.insert(user_id.value(), id);
        table.carts.insert(
            id,
            StoredCart {
                id: CartId::new(id),
                user_id,
                lines: Vec::new(),
            },
        );

        Ok(CartId::new(id))
    }

    async fn append_line(&self, cart_id: CartId, line: CartLine) -> Result<(), DomainError> {
        let mut table = self.table.write().await;

        let cart = table
            .carts
            .get_mut(&cart_id.value())
            .ok_or_else(|| DomainError::not_found(format!("Cart '{}' not found", cart_id)))?;

        cart.lines.push(line);
        Ok(())
    }
}
