//! Infrastructure layer - Store, cache and token implementations

pub mod auth;
pub mod cache;
pub mod cart;
pub mod credentials;
pub mod logging;
pub mod product;
pub mod user;

pub use logging::init_logging;
