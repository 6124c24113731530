//! Catalog repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{NewProduct, Product, ProductId};
use crate::domain::DomainError;

/// Repository trait for catalog storage
#[async_trait]
pub trait ProductRepository: Send + Sync + Debug {
    /// Look up a product by its application id
    async fn get(&self, id: ProductId) -> Result<Option<Product>, DomainError>;

    /// Insert a product.
    ///
    /// Fails with `AlreadyExists` when a caller-supplied id is taken.
    async fn create(&self, product: NewProduct) -> Result<Product, DomainError>;

    /// Remove a product, returning whether it existed
    async fn delete(&self, id: ProductId) -> Result<bool, DomainError>;

    /// Check if a product id resolves
    async fn exists(&self, id: ProductId) -> Result<bool, DomainError> {
        Ok(self.get(id).await?.is_some())
    }
}
