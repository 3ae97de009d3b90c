//! JWT access/refresh token issuing and validation

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use uuid::Uuid;

use crate::domain::user::User;
use crate::domain::DomainError;

/// Kind of token, carried in the `token_type` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Access => write!(f, "access"),
            Self::Refresh => write!(f, "refresh"),
        }
    }
}

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Email of the subject at issuance time
    pub email: String,
    pub token_type: TokenType,
    /// Unique token ID
    pub jti: String,
    /// Issued at timestamp (Unix epoch)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
}

impl TokenClaims {
    fn new(user: &User, token_type: TokenType, issued_at: i64, lifetime: Duration) -> Self {
        Self {
            sub: user.id().as_str().to_string(),
            email: user.email().to_string(),
            token_type,
            jti: Uuid::new_v4().to_string(),
            iat: issued_at,
            exp: issued_at + lifetime.num_seconds(),
        }
    }

    /// A token is expired at its `exp` instant, not one second later
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp())
    }

    /// Get user ID from claims
    pub fn user_id(&self) -> &str {
        &self.sub
    }
}

/// Signed access and refresh tokens minted together
#[derive(Clone, PartialEq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"[hidden]")
            .field("refresh_token", &"[hidden]")
            .finish()
    }
}

/// Configuration for JWT service
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for HS256 signing
    pub secret: String,
    pub access_lifetime: Duration,
    pub refresh_lifetime: Duration,
}

impl Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[hidden]")
            .field("access_lifetime", &self.access_lifetime)
            .field("refresh_lifetime", &self.refresh_lifetime)
            .finish()
    }
}

impl JwtConfig {
    /// Create new JWT configuration
    pub fn new(
        secret: impl Into<String>,
        access_token_minutes: i64,
        refresh_token_days: i64,
    ) -> Self {
        Self {
            secret: secret.into(),
            access_lifetime: Duration::minutes(access_token_minutes),
            refresh_lifetime: Duration::days(refresh_token_days),
        }
    }

    pub fn lifetime(&self, token_type: TokenType) -> Duration {
        match token_type {
            TokenType::Access => self.access_lifetime,
            TokenType::Refresh => self.refresh_lifetime,
        }
    }
}

/// Trait for issuing and validating tokens
pub trait TokenIssuer: Send + Sync + Debug {
    /// Mint a fresh access/refresh pair for a user
    fn issue_pair(&self, user: &User) -> Result<TokenPair, DomainError>;

    /// Mint a new access token only
    fn issue_access(&self, user: &User) -> Result<String, DomainError>;

    /// Validate a token of the expected kind against the given clock
    fn validate_at(
        &self,
        token: &str,
        expected: TokenType,
        now: i64,
    ) -> Result<TokenClaims, DomainError>;

    /// Validate a token of the expected kind against the current time
    fn validate(&self, token: &str, expected: TokenType) -> Result<TokenClaims, DomainError> {
        self.validate_at(token, expected, Utc::now().timestamp())
    }
}

/// HS256 JWT service
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("config", &self.config)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Create a new JWT service.
    ///
    /// An empty secret is a configuration error and must abort startup.
    pub fn new(config: JwtConfig) -> Result<Self, DomainError> {
        if config.secret.trim().is_empty() {
            return Err(DomainError::configuration("JWT signing secret must not be empty"));
        }

        if config.access_lifetime <= Duration::zero() || config.refresh_lifetime <= Duration::zero()
        {
            return Err(DomainError::configuration(
                "Token lifetimes must be positive",
            ));
        }

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Ok(Self {
            config,
            encoding_key,
            decoding_key,
        })
    }

    pub fn config(&self) -> &JwtConfig {
        &self.config
    }

    fn sign(&self, user: &User, token_type: TokenType, issued_at: i64) -> Result<String, DomainError> {
        let claims = TokenClaims::new(user, token_type, issued_at, self.config.lifetime(token_type));

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to sign {} token: {}", token_type, e)))
    }
}

impl TokenIssuer for JwtService {
    fn issue_pair(&self, user: &User) -> Result<TokenPair, DomainError> {
        let now = Utc::now().timestamp();

        Ok(TokenPair {
            access_token: self.sign(user, TokenType::Access, now)?,
            refresh_token: self.sign(user, TokenType::Refresh, now)?,
        })
    }

    fn issue_access(&self, user: &User) -> Result<String, DomainError> {
        self.sign(user, TokenType::Access, Utc::now().timestamp())
    }

    fn validate_at(
        &self,
        token: &str,
        expected: TokenType,
        now: i64,
    ) -> Result<TokenClaims, DomainError> {
        // Expiry is checked below with zero leeway and an inclusive bound.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| DomainError::authentication(format!("Invalid token: {}", e)))?
            .claims;

        if claims.token_type != expected {
            return Err(DomainError::authentication(format!(
                "Expected {} token, got {} token",
                expected, claims.token_type
            )));
        }

        if claims.is_expired_at(now) {
            return Err(DomainError::authentication("Token has expired"));
        }

        Ok(claims)
    }
}
