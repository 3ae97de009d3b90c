//! User service for registration, login, token refresh and profiles

use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::domain::user::{
    normalize_email, validate_email, validate_name, validate_password_strength, User, UserId,
    UserRepository, UserValidationError, MAX_NAME_LENGTH,
};
use crate::domain::{DomainError, FieldErrors};
use crate::infrastructure::auth::{TokenIssuer, TokenPair, TokenType};

use super::password::PasswordHasher;

pub const DUPLICATE_EMAIL: &str = "user with this email address already exists.";
pub const INVALID_CREDENTIALS: &str = "Invalid email or password.";
pub const INVALID_REFRESH_TOKEN: &str = "Token is invalid or expired";
pub const NON_FIELD_ERRORS: &str = "non_field_errors";
const BLANK: &str = "This field may not be blank.";
/// Verified against when the email is unknown so both paths pay the hash cost
const DUMMY_PASSWORD: &str = "storefront-dummy-password";

/// Request for registering a new account
#[derive(Clone, Default)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub password2: String,
    pub first_name: String,
    pub last_name: String,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("password", &"[hidden]")
            .field("password2", &"[hidden]")
            .finish()
    }
}

/// Name fields supplied by a profile update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// User service for account lifecycle and token issuance
#[derive(Debug)]
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
    tokens: Arc<dyn TokenIssuer>,
    dummy_hash: OnceCell<String>,
}

impl<R: UserRepository, H: PasswordHasher> UserService<R, H> {
    /// Create a new user service
    pub fn new(repository: Arc<R>, hasher: Arc<H>, tokens: Arc<dyn TokenIssuer>) -> Self {
        Self {
            repository,
            hasher,
            tokens,
            dummy_hash: OnceCell::new(),
        }
    }

    pub fn repository(&self) -> Arc<R> {
        self.repository.clone()
    }

    /// Register a new account and mint its first token pair.
    ///
    /// The ID is assigned and both tokens are signed before anything is
    /// written, so a signing failure leaves no user behind and a failed
    /// insert returns no tokens.
    pub async fn register(&self, request: RegisterRequest) -> Result<(User, TokenPair), DomainError> {
        let email = normalize_email(&request.email);
        let mut errors = FieldErrors::new();

        match validate_email(&email) {
            Ok(()) => {
                if self.repository.email_exists(&email).await? {
                    push(&mut errors, "email", DUPLICATE_EMAIL);
                }
            }
            Err(e) => push(&mut errors, "email", e.to_string()),
        }

        if request.password.is_empty() {
            push(&mut errors, "password", BLANK);
        } else if let Err(violations) = validate_password_strength(&request.password, &email) {
            for violation in violations {
                push(&mut errors, "password", violation.to_string());
            }
        }

        if request.password2.is_empty() {
            push(&mut errors, "password2", BLANK);
        }

        let first_name = registration_name(&request.first_name, "first_name", &mut errors);
        let last_name = registration_name(&request.last_name, "last_name", &mut errors);

        if !errors.is_empty() {
            return Err(DomainError::fields(errors));
        }

        if request.password != request.password2 {
            return Err(DomainError::field(
                "password",
                UserValidationError::PasswordMismatch.to_string(),
            ));
        }

        let password_hash = self.hasher.hash(&request.password)?;
        let user = User::new(UserId::generate(), email, password_hash)
            .with_names(first_name, last_name);

        let tokens = self.tokens.issue_pair(&user)?;

        let user = self.repository.create(user).await.map_err(|e| match e {
            DomainError::Conflict { .. } => DomainError::conflict(DUPLICATE_EMAIL),
            other => other,
        })?;

        info!(user_id = %user.id(), "User registered");

        Ok((user, tokens))
    }

    /// Verify credentials, record the login and mint a fresh token pair
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, TokenPair), DomainError> {
        let email = normalize_email(email);
        let mut errors = FieldErrors::new();

        if email.is_empty() {
            push(&mut errors, "email", BLANK);
        } else if let Err(e) = validate_email(&email) {
            push(&mut errors, "email", e.to_string());
        }
        if password.is_empty() {
            push(&mut errors, "password", BLANK);
        }
        if !errors.is_empty() {
            return Err(DomainError::fields(errors));
        }

        let Some(user) = self.repository.get_by_email(&email).await? else {
            debug!("Login attempt for unknown email");
            self.verify_against_dummy(password);
            return Err(DomainError::field(NON_FIELD_ERRORS, INVALID_CREDENTIALS));
        };

        let verified = self.hasher.verify(password, user.password_hash());

        // Inactive accounts get the same answer as a wrong password
        if !verified || !user.is_active() {
            warn!(user_id = %user.id(), active = user.is_active(), "Login failed");
            return Err(DomainError::field(NON_FIELD_ERRORS, INVALID_CREDENTIALS));
        }

        self.repository.record_login(user.id()).await?;

        let user = self
            .repository
            .get(user.id())
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", user.id())))?;

        let tokens = self.tokens.issue_pair(&user)?;

        info!(user_id = %user.id(), "User logged in");

        Ok((user, tokens))
    }

    fn verify_against_dummy(&self, password: &str) {
        match self.dummy_hash.get_or_try_init(|| self.hasher.hash(DUMMY_PASSWORD)) {
            Ok(hash) => {
                self.hasher.verify(password, hash);
            }
            Err(e) => warn!(error = %e, "Failed to prepare dummy password hash"),
        }
    }

    /// Mint a new access token from a refresh token.
    ///
    /// The refresh token is not rotated. Its subject must still exist and
    /// be active.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, DomainError> {
        let claims = self
            .tokens
            .validate(refresh_token, TokenType::Refresh)
            .map_err(|e| {
                debug!(error = %e, "Refresh token rejected");
                DomainError::authentication(INVALID_REFRESH_TOKEN)
            })?;

        let id = UserId::parse(claims.user_id())
            .map_err(|_| DomainError::authentication(INVALID_REFRESH_TOKEN))?;

        let user = match self.repository.get(&id).await? {
            Some(user) if user.is_active() => user,
            _ => return Err(DomainError::authentication(INVALID_REFRESH_TOKEN)),
        };

        let access = self.tokens.issue_access(&user)?;

        debug!(user_id = %user.id(), "Access token refreshed");

        Ok(access)
    }

    /// Get a user by ID
    pub async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        self.repository.get(id).await
    }

    /// Update name fields. Only supplied fields change.
    pub async fn update_profile(
        &self,
        id: &UserId,
        update: ProfileUpdate,
    ) -> Result<User, DomainError> {
        let mut errors = FieldErrors::new();

        let first_name = update
            .first_name
            .as_deref()
            .map(|value| validate_name("First name", value))
            .transpose()
            .unwrap_or_else(|e| {
                push(&mut errors, "first_name", e.to_string());
                None
            });

        let last_name = update
            .last_name
            .as_deref()
            .map(|value| validate_name("Last name", value))
            .transpose()
            .unwrap_or_else(|e| {
                push(&mut errors, "last_name", e.to_string());
                None
            });

        if !errors.is_empty() {
            return Err(DomainError::fields(errors));
        }

        let mut user = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;

        if let Some(first_name) = first_name {
            user.set_first_name(first_name);
        }
        if let Some(last_name) = last_name {
            user.set_last_name(last_name);
        }

        let user = self.repository.update(&user).await?;

        debug!(user_id = %user.id(), "Profile updated");

        Ok(user)
    }
}

fn push(errors: &mut FieldErrors, field: &str, message: impl Into<String>) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.into());
}

fn registration_name(value: &str, field: &str, errors: &mut FieldErrors) -> String {
    let trimmed = value.trim();

    if trimmed.chars().count() > MAX_NAME_LENGTH {
        push(
            errors,
            field,
            UserValidationError::FieldTooLong(MAX_NAME_LENGTH).to_string(),
        );
    }

    trimmed.to_string()
}
