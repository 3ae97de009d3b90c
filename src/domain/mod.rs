//! Domain layer - Core business logic and entities

pub mod error;
pub mod product;
pub mod user;

pub use error::{DomainError, FieldErrors};
pub use product::{Price, Product, ProductId, ProductRepository, ProductValidationError};
pub use user::{User, UserId, UserRepository, UserValidationError};
