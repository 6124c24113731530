//! Credential store implementations

mod static_store;
mod user_store;

pub use static_store::StaticCredentialStore;
pub use user_store::UserCredentialStore;
