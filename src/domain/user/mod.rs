//! User domain
//!
//! Identity records, their validation rules, and the repository trait that
//! the in-memory and relational stores implement.

mod entity;
mod repository;
mod validation;

pub use entity::{NewUser, UserId, UserIdentity};
pub use repository::UserRepository;
pub use validation::{
    validate_email, validate_name, validate_password, validate_username, UserValidationError,
};

#[cfg(test)]
pub use repository::mock::MockUserRepository;
