//! Catalog infrastructure - in-memory and MongoDB product repositories

mod in_memory;
mod mongo_repository;

pub use in_memory::InMemoryProductRepository;
pub use mongo_repository::{MongoProductRepository, ProductDocument};
