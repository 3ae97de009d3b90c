//! Request authentication by an ordered chain of token sources
//!
//! Each source looks for a raw token in the request headers. The resolver
//! tries them in order and the first token that validates and maps to an
//! identity wins. A present but invalid token only moves the chain on to
//! the next source; the request is rejected once every source is exhausted.

use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use axum_extra::extract::cookie::CookieJar;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::debug;

use super::jwt::{TokenClaims, TokenIssuer, TokenType};
use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

pub const NOT_AUTHENTICATED: &str = "Authentication credentials were not provided.";
pub const INVALID_TOKEN: &str = "Given token not valid for any token type";

/// Somewhere a raw token can be carried on a request
pub trait TokenSource: Send + Sync + Debug {
    /// Short label used in logs
    fn name(&self) -> &'static str;

    /// Extract the raw token, if this source carries one
    fn extract(&self, headers: &HeaderMap) -> Option<String>;
}

/// Token stored in a named cookie
#[derive(Debug, Clone)]
pub struct CookieTokenSource {
    cookie_name: String,
}

impl CookieTokenSource {
    pub fn new(cookie_name: impl Into<String>) -> Self {
        Self {
            cookie_name: cookie_name.into(),
        }
    }
}

impl TokenSource for CookieTokenSource {
    fn name(&self) -> &'static str {
        "cookie"
    }

    fn extract(&self, headers: &HeaderMap) -> Option<String> {
        CookieJar::from_headers(headers)
            .get(&self.cookie_name)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    }
}

/// `Authorization: Bearer <token>` header
#[derive(Debug, Clone, Default)]
pub struct BearerTokenSource;

impl TokenSource for BearerTokenSource {
    fn name(&self) -> &'static str {
        "authorization_header"
    }

    fn extract(&self, headers: &HeaderMap) -> Option<String> {
        extract_bearer_token(headers)
    }
}

/// Extract the token from a well-formed `Bearer` authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.split_whitespace();

    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Some(token.to_string()),
        _ => None,
    }
}

/// Maps verified token claims to the identity a service works with
#[async_trait]
pub trait IdentityProvider: Send + Sync + Debug {
    type Identity: Send;

    async fn identify(&self, claims: TokenClaims) -> Result<Self::Identity, DomainError>;
}

/// Identity resolved from claims alone, for services without a user table
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    pub user_id: String,
    pub email: String,
}

#[derive(Debug, Clone, Default)]
pub struct ClaimsIdentityProvider;

#[async_trait]
impl IdentityProvider for ClaimsIdentityProvider {
    type Identity = Principal;

    async fn identify(&self, claims: TokenClaims) -> Result<Principal, DomainError> {
        Ok(Principal {
            user_id: claims.sub,
            email: claims.email,
        })
    }
}

/// Looks the subject up in the user store and requires an active account
#[derive(Debug)]
pub struct UserIdentityProvider<R: UserRepository> {
    users: Arc<R>,
}

impl<R: UserRepository> UserIdentityProvider<R> {
    pub fn new(users: Arc<R>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<R: UserRepository> IdentityProvider for UserIdentityProvider<R> {
    type Identity = User;

    async fn identify(&self, claims: TokenClaims) -> Result<User, DomainError> {
        let id = UserId::parse(claims.user_id())
            .map_err(|e| DomainError::authentication(e.to_string()))?;

        let user = self
            .users
            .get(&id)
            .await?
            .ok_or_else(|| DomainError::authentication("User not found"))?;

        if !user.is_active() {
            return Err(DomainError::authentication("User is inactive"));
        }

        Ok(user)
    }
}

/// Ordered chain of token sources sharing one validator and identity lookup
pub struct TokenResolver<I: Send> {
    sources: Vec<Box<dyn TokenSource>>,
    issuer: Arc<dyn TokenIssuer>,
    identities: Arc<dyn IdentityProvider<Identity = I>>,
}

impl<I: Send> Debug for TokenResolver<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResolver")
            .field("sources", &self.sources)
            .field("issuer", &self.issuer)
            .field("identities", &self.identities)
            .finish()
    }
}

impl<I: Send> TokenResolver<I> {
    pub fn new(
        issuer: Arc<dyn TokenIssuer>,
        identities: Arc<dyn IdentityProvider<Identity = I>>,
    ) -> Self {
        Self {
            sources: Vec::new(),
            issuer,
            identities,
        }
    }

    /// Append a source; earlier sources take precedence
    pub fn with_source(mut self, source: impl TokenSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Access cookie first, then the bearer header
    pub fn cookie_then_header(
        access_cookie_name: impl Into<String>,
        issuer: Arc<dyn TokenIssuer>,
        identities: Arc<dyn IdentityProvider<Identity = I>>,
    ) -> Self {
        Self::new(issuer, identities)
            .with_source(CookieTokenSource::new(access_cookie_name))
            .with_source(BearerTokenSource)
    }

    /// Resolve the caller's identity.
    ///
    /// Returns `DomainError::Authentication` when no source yields a valid
    /// token. Store failures during identity lookup are returned as-is.
    pub async fn resolve(&self, headers: &HeaderMap) -> Result<I, DomainError> {
        let mut saw_token = false;

        for source in &self.sources {
            let Some(token) = source.extract(headers) else {
                continue;
            };
            saw_token = true;

            match self.try_token(&token).await {
                Ok(identity) => {
                    debug!(source = source.name(), "Request authenticated");
                    return Ok(identity);
                }
                Err(DomainError::Authentication { message }) => {
                    debug!(source = source.name(), reason = %message, "Token rejected, trying next source");
                }
                Err(other) => return Err(other),
            }
        }

        if saw_token {
            Err(DomainError::authentication(INVALID_TOKEN))
        } else {
            Err(DomainError::authentication(NOT_AUTHENTICATED))
        }
    }

    async fn try_token(&self, token: &str) -> Result<I, DomainError> {
        let claims = self.issuer.validate(token, TokenType::Access)?;
        self.identities.identify(claims).await
    }
}
