//! Cart domain

mod entity;
mod repository;

pub use entity::{Cart, CartId, CartItem, CartLine, StoredCart, MAX_LINE_QUANTITY};
pub use repository::CartRepository;

#[cfg(test)]
pub use repository::mock::MockCartRepository;
