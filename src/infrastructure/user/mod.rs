//! Account infrastructure: password hashing, repositories and the user service

mod password;
mod postgres_repository;
mod repository;
mod service;

pub use password::{Argon2Hasher, PasswordHasher};
pub use postgres_repository::PostgresUserRepository;
pub use repository::InMemoryUserRepository;
pub use service::{
    ProfileUpdate, RegisterRequest, UserService, DUPLICATE_EMAIL, INVALID_CREDENTIALS,
    INVALID_REFRESH_TOKEN, NON_FIELD_ERRORS,
};
