//! Joins relational cart lines with the document-store catalog

use futures::future::try_join_all;
use std::sync::Arc;

use crate::domain::{
    Cart, CartItem, CartLine, CartRepository, DomainError, Product, ProductId, ProductRepository,
    UserId,
};

/// Builds cart views across the cart store and the catalog.
///
/// Lines whose product no longer resolves are left out of the view; they stay
/// in the cart store untouched.
#[derive(Debug, Clone)]
pub struct CartAssembler {
    carts: Arc<dyn CartRepository>,
    products: Arc<dyn ProductRepository>,
}

impl CartAssembler {
    pub fn new(carts: Arc<dyn CartRepository>, products: Arc<dyn ProductRepository>) -> Self {
        Self { carts, products }
    }

    pub async fn get_cart(&self, user_id: UserId) -> Result<Cart, DomainError> {
        let stored = self
            .carts
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Cart for user '{}' not found", user_id)))?;

        let resolved = try_join_all(stored.lines.into_iter().map(|line| self.resolve(line))).await?;

        let mut items = Vec::with_capacity(resolved.len());
        for (line, product) in resolved {
            match product {
                Some(product) => items.push(CartItem::resolved(line, &product)),
                None => tracing::debug!(
                    user_id = %user_id,
                    product_id = %line.product_id(),
                    "Dropping cart line with dangling product"
                ),
            }
        }

        Ok(Cart { user_id, items })
    }

    /// Append a line for an existing product and return the updated cart.
    ///
    /// Quantity and product are checked before the cart store is written, so a
    /// rejected add never creates an empty cart. The returned view is read back
    /// after the line is stored; if that read fails the error is returned even
    /// though the line was kept, and retrying appends a second line.
    pub async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Cart, DomainError> {
        let line = CartLine::new(product_id, quantity)?;

        if !self.products.exists(product_id).await? {
            return Err(DomainError::not_found(format!(
                "Product '{}' not found",
                product_id
            )));
        }

        let cart_id = self.carts.get_or_create(user_id).await?;
        self.carts.append_line(cart_id, line).await?;

        tracing::debug!(
            user_id = %user_id,
            cart_id = %cart_id,
            product_id = %product_id,
            quantity,
            "Added cart line"
        );

        self.get_cart(user_id).await.inspect_err(|e| {
            tracing::warn!(
                user_id = %user_id,
                cart_id = %cart_id,
                error = %e,
                "Cart line stored but the cart view could not be read back"
            )
        })
    }

    async fn resolve(&self, line: CartLine) -> Result<(CartLine, Option<Product>), DomainError> {
        let product = self.products.get(line.product_id()).await?;
        Ok((line, product))
    }
}
