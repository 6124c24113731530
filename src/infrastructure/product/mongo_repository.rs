//! MongoDB catalog repository
//!
//! Products live in one collection as `{ id, name, price }` documents. The
//! application `id` is the lookup key and carries a unique index; Mongo's own
//! `_id` is left to the server and ignored when reading.

use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, IndexModel};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, NewProduct, Product, ProductId, ProductRepository};

const DUPLICATE_KEY: i32 = 11000;
const MAX_ASSIGN_ATTEMPTS: usize = 3;

/// Document shape of a stored product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDocument {
    pub id: i64,
    pub name: String,
    pub price: f64,
}

impl From<ProductDocument> for Product {
    fn from(doc: ProductDocument) -> Self {
        Product::new(ProductId::new(doc.id), doc.name, doc.price)
    }
}

impl From<&Product> for ProductDocument {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id().value(),
            name: product.name().to_string(),
            price: product.price(),
        }
    }
}

fn is_duplicate_key(e: &mongodb::error::Error) -> bool {
    matches!(
        e.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(we)) if we.code == DUPLICATE_KEY
    )
}

/// The id assigned after the current highest one
fn next_after(highest: i64) -> Result<ProductId, DomainError> {
    highest
        .checked_add(1)
        .map(ProductId::new)
        .ok_or_else(|| DomainError::storage("Could not assign a free product id"))
}

/// MongoDB implementation of ProductRepository
#[derive(Debug, Clone)]
pub struct MongoProductRepository {
    collection: Collection<ProductDocument>,
}

impl MongoProductRepository {
    pub fn new(collection: Collection<ProductDocument>) -> Self {
        Self { collection }
    }

    /// Connect and bind to `database.collection`
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self, DomainError> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to MongoDB: {}", e)))?;

        Ok(Self::new(client.database(database).collection(collection)))
    }

    /// Create the unique index on `id`; a no-op when it already exists
    pub async fn ensure_indexes(&self) -> Result<(), DomainError> {
        let index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("product_id_unique".to_string())
                    .build(),
            )
            .build();

        self.collection
            .create_index(index)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create product index: {}", e)))?;

        tracing::debug!(collection = %self.collection.name(), "Product indexes ensured");
        Ok(())
    }

    async fn next_id(&self) -> Result<ProductId, DomainError> {
        let highest = self
            .collection
            .find_one(doc! {})
            .sort(doc! { "id": -1 })
            .await
            .map_err(|e| DomainError::storage(format!("Failed to read highest product id: {}", e)))?;

        match highest {
            None => Ok(ProductId::new(1)),
            Some(doc) => next_after(doc.id),
        }
    }

    async fn insert(&self, product: &Product) -> Result<(), mongodb::error::Error> {
        self.collection
            .insert_one(ProductDocument::from(product))
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    async fn get(&self, id: ProductId) -> Result<Option<Product>, DomainError> {
        let document = self
            .collection
            .find_one(doc! { "id": id.value() })
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get product: {}", e)))?;

        Ok(document.map(Product::from))
    }

    async fn create(&self, product: NewProduct) -> Result<Product, DomainError> {
        if let Some(id) = product.id {
            let created = product.into_product(id);

            return match self.insert(&created).await {
                Ok(()) => Ok(created),
                Err(e) if is_duplicate_key(&e) => Err(DomainError::already_exists(format!(
                    "Product '{}' already exists",
                    id
                ))),
                Err(e) => Err(DomainError::storage(format!("Failed to create product: {}", e))),
            };
        }

        // Assigned ids race with concurrent inserts; the unique index arbitrates.
        for _ in 0..MAX_ASSIGN_ATTEMPTS {
            let created = product.clone().into_product(self.next_id().await?);

            match self.insert(&created).await {
                Ok(()) => return Ok(created),
                Err(e) if is_duplicate_key(&e) => {
                    tracing::debug!(product_id = %created.id(), "Assigned product id taken, retrying");
                }
                Err(e) => {
                    return Err(DomainError::storage(format!("Failed to create product: {}", e)));
                }
            }
        }

        Err(DomainError::storage("Could not assign a free product id"))
    }

    async fn delete(&self, id: ProductId) -> Result<bool, DomainError> {
        let result = self
            .collection
            .delete_one(doc! { "id": id.value() })
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete product: {}", e)))?;

        Ok(result.deleted_count > 0)
    }
}
