//! Infrastructure layer - storage, authentication and service implementations

pub mod auth;
pub mod logging;
pub mod product;
pub mod storage;
pub mod user;
