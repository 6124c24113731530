//! In-memory catalog repository

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{DomainError, NewProduct, Product, ProductId, ProductRepository};

/// In-memory implementation of ProductRepository.
///
/// Store-assigned ids continue from the highest id present.
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<BTreeMap<i64, Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn get(&self, id: ProductId) -> Result<Option<Product>, DomainError> {
        Ok(self.products.read().await.get(&id.value()).cloned())
    }

    async fn create(&self, product: NewProduct) -> Result<Product, DomainError> {
        let mut products = self.products.write().await;

        let id = match product.id {
            Some(id) if products.contains_key(&id.value()) => {
                return Err(DomainError::already_exists(format!(
                    "Product '{}' already exists",
                    id
                )));
            }
            Some(id) => id,
            None => match products.keys().next_back() {
                None => ProductId::new(1),
                Some(last) => last
                    .checked_add(1)
                    .map(ProductId::new)
                    .ok_or_else(|| DomainError::storage("Could not assign a free product id"))?,
            },
        };

        let created = product.into_product(id);
        products.insert(id.value(), created.clone());
        Ok(created)
    }

    async fn delete(&self, id: ProductId) -> Result<bool, DomainError> {
        Ok(self.products.write().await.remove(&id.value()).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_with_caller_id() {
        let repo = InMemoryProductRepository::new();

        let mouse = repo
            .create(NewProduct::new("Mouse", 19.99).with_id(7))
            .await
            .unwrap();

        assert_eq!(mouse.id(), ProductId::new(7));
        assert_eq!(repo.get(ProductId::new(7)).await.unwrap(), Some(mouse));
    }

    #[tokio::test]
    async fn test_assigned_id_follows_highest() {
        let repo = InMemoryProductRepository::new();
        repo.create(NewProduct::new("Mouse", 19.99).with_id(7))
            .await
            .unwrap();

        let laptop = repo.create(NewProduct::new("Laptop", 999.99)).await.unwrap();
        assert_eq!(laptop.id(), ProductId::new(8));
    }

    #[tokio::test]
    async fn test_assigned_id_exhausted() {
        let repo = InMemoryProductRepository::new();
        repo.create(NewProduct::new("Max", 1.0).with_id(i64::MAX))
            .await
            .unwrap();

        let err = repo.create(NewProduct::new("Next", 1.0)).await.unwrap_err();
        assert!(matches!(err, DomainError::Storage { .. }));
        assert!(repo.get(ProductId::new(i64::MIN)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_id() {
        let repo = InMemoryProductRepository::new();
        repo.create(NewProduct::new("Mouse", 19.99).with_id(7))
            .await
            .unwrap();

        let err = repo
            .create(NewProduct::new("Keyboard", 49.0).with_id(7))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryProductRepository::new();
        repo.create(NewProduct::new("Mouse", 19.99).with_id(7))
            .await
            .unwrap();

        assert!(repo.delete(ProductId::new(7)).await.unwrap());
        assert!(!repo.delete(ProductId::new(7)).await.unwrap());
        assert!(!repo.exists(ProductId::new(7)).await.unwrap());
    }
}
