//! PostgreSQL cart repository implementation
//!
//! Expected schema:
//!
//! ```sql
//! CREATE TABLE carts (
//!     id      BIGSERIAL PRIMARY KEY,
//!     user_id BIGINT NOT NULL UNIQUE REFERENCES users(id)
//! );
//!
//! CREATE TABLE cart_items (
//!     id         BIGSERIAL PRIMARY KEY,
//!     cart_id    BIGINT NOT NULL REFERENCES carts(id),
//!     product_id BIGINT NOT NULL,
//!     quantity   INT NOT NULL CHECK (quantity > 0)
//! );
//! ```
//!
//! `cart_items.product_id` has no foreign key: products live in the document
//! store.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::{CartId, CartLine, CartRepository, DomainError, ProductId, StoredCart, UserId};

/// Row shape of `cart_items`
#[derive(Debug, sqlx::FromRow)]
struct CartItemRow {
    product_id: i64,
    quantity: i32,
}

impl CartItemRow {
    fn into_line(self) -> Option<CartLine> {
        let quantity = u32::try_from(self.quantity).ok()?;
        CartLine::new(ProductId::new(self.product_id), quantity).ok()
    }
}

/// PostgreSQL implementation of CartRepository
#[derive(Debug, Clone)]
pub struct PostgresCartRepository {
    pool: PgPool,
}

impl PostgresCartRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CartRepository for PostgresCartRepository {
    async fn find_by_user(&self, user_id: UserId) -> Result<Option<StoredCart>, DomainError> {
        let row = sqlx::query("SELECT id FROM carts WHERE user_id = $1")
            .bind(user_id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get cart: {}", e)))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let cart_id = CartId::new(row.get::<i64, _>("id"));

        let items = sqlx::query_as::<_, CartItemRow>(
            "SELECT product_id, quantity FROM cart_items WHERE cart_id = $1 ORDER BY id",
        )
        .bind(cart_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get cart items: {}", e)))?;

        let mut lines = Vec::with_capacity(items.len());
        for item in items {
            let (product_id, quantity) = (item.product_id, item.quantity);
            match item.into_line() {
                Some(line) => lines.push(line),
                None => tracing::warn!(
                    cart_id = %cart_id,
                    product_id,
                    quantity,
                    "Skipping cart item with non-positive quantity"
                ),
            }
        }

        Ok(Some(StoredCart {
            id: cart_id,
            user_id,
            lines,
        }))
    }

    async fn get_or_create(&self, user_id: UserId) -> Result<CartId, DomainError> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO carts (user_id) VALUES ($1)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING id
            "#,
        )
        .bind(user_id.value())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                DomainError::not_found(format!("User '{}' not found", user_id))
            }
            _ => DomainError::storage(format!("Failed to get or create cart: {}", e)),
        })?;

        Ok(CartId::new(id))
    }

    async fn append_line(&self, cart_id: CartId, line: CartLine) -> Result<(), DomainError> {
        let quantity = i32::try_from(line.quantity())
            .map_err(|_| DomainError::internal("Cart line quantity out of range"))?;

        sqlx::query("INSERT INTO cart_items (cart_id, product_id, quantity) VALUES ($1, $2, $3)")
            .bind(cart_id.value())
            .bind(line.product_id().value())
            .bind(quantity)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                    DomainError::not_found(format!("Cart '{}' not found", cart_id))
                }
                _ => DomainError::storage(format!("Failed to add cart item: {}", e)),
            })?;

        Ok(())
    }
}
