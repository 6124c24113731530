//! Catalog product entity

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

const MAX_PRODUCT_NAME_LENGTH: usize = 200;

/// Application-level product identifier.
///
/// This is the `id` field the catalog is keyed by, independent of whatever
/// native identity the backing store assigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i64);

impl ProductId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A catalog product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    price: f64,
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>, price: f64) -> Self {
        Self {
            id,
            name: name.into(),
            price,
        }
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> f64 {
        self.price
    }
}

/// A product to be inserted; without an id the store assigns one
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub id: Option<ProductId>,
    pub name: String,
    pub price: f64,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            price,
        }
    }

    pub fn with_id(mut self, id: impl Into<ProductId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("Product name cannot be empty"));
        }

        if self.name.chars().count() > MAX_PRODUCT_NAME_LENGTH {
            return Err(DomainError::validation(format!(
                "Product name exceeds maximum length of {} characters",
                MAX_PRODUCT_NAME_LENGTH
            )));
        }

        if !self.price.is_finite() || self.price < 0.0 {
            return Err(DomainError::validation(
                "Product price must be a non-negative number",
            ));
        }

        Ok(())
    }

    pub fn into_product(self, id: ProductId) -> Product {
        Product::new(id, self.name, self.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_getters() {
        let product = Product::new(ProductId::new(7), "Mouse", 19.99);

        assert_eq!(product.id().value(), 7);
        assert_eq!(product.name(), "Mouse");
        assert!((product.price() - 19.99).abs() < f64::EPSILON);
    }

    #[test]
    fn test_new_product_validation() {
        assert!(NewProduct::new("Laptop", 999.99).validate().is_ok());
        assert!(NewProduct::new("Freebie", 0.0).validate().is_ok());

        assert!(NewProduct::new("", 1.0).validate().is_err());
        assert!(NewProduct::new("Broken", -0.01).validate().is_err());
        assert!(NewProduct::new("Broken", f64::NAN).validate().is_err());
        assert!(NewProduct::new("Broken", f64::INFINITY).validate().is_err());
    }

    #[test]
    fn test_into_product_keeps_fields() {
        let product = NewProduct::new("Headphones", 149.99)
            .with_id(3)
            .into_product(ProductId::new(3));

        assert_eq!(product.id(), ProductId::new(3));
        assert_eq!(product.name(), "Headphones");
    }
}
