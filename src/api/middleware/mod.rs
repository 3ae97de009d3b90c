//! API middleware components

pub mod auth;
pub mod logging;
pub mod security;

pub use auth::{RequireIdentity, RequireUser};
pub use logging::{logging_middleware, redact_headers};
pub use security::security_headers_middleware;
