//! Cart infrastructure - cart repositories and the cart assembler

mod assembler;
mod in_memory;
mod postgres_repository;

pub use assembler::CartAssembler;
pub use in_memory::InMemoryCartRepository;
pub use postgres_repository::PostgresCartRepository;
