//! Authentication infrastructure module
//!
//! Token issuing and validation, the cookie-then-header token resolver,
//! and the cookie manager that carries tokens to and from browsers.

mod cookies;
mod jwt;
mod resolver;

pub use cookies::{CookieManager, CookiePolicy, DEFAULT_ACCESS_COOKIE, DEFAULT_REFRESH_COOKIE};
pub use jwt::{JwtConfig, JwtService, TokenClaims, TokenIssuer, TokenPair, TokenType};
pub use resolver::{
    extract_bearer_token, BearerTokenSource, ClaimsIdentityProvider, CookieTokenSource,
    IdentityProvider, Principal, TokenResolver, TokenSource, UserIdentityProvider,
    INVALID_TOKEN, NOT_AUTHENTICATED,
};
