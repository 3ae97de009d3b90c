//! User domain
//!
//! Domain types and traits for user accounts: the user entity, the
//! registration and profile validation rules, and the repository trait.

mod entity;
mod repository;
mod validation;

pub use entity::{StoredUser, User, UserId};
pub use repository::UserRepository;
pub use validation::{
    normalize_email, validate_email, validate_name, validate_password_strength,
    UserValidationError, MAX_EMAIL_LENGTH, MAX_NAME_LENGTH,
};

#[cfg(test)]
pub use repository::mock::MockUserRepository;
