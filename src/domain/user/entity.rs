//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::UserValidationError;

/// User identifier - a UUID assigned when the account is created
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Parse an identifier, rejecting anything that is not a UUID
    pub fn parse(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let id = id.as_ref();
        Uuid::parse_str(id)
            .map(|uuid| Self(uuid.to_string()))
            .map_err(|_| UserValidationError::InvalidId(id.to_string()))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Persisted user row, used by repositories to rebuild a [`User`]
#[derive(Debug, Clone)]
pub struct StoredUser {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// User account
#[derive(Debug, Clone, Serialize)]
pub struct User {
    id: UserId,
    /// Normalized (trimmed, lower-cased) login email
    email: String,
    /// Argon2 password hash - never exposed in serialization
    #[serde(skip_serializing)]
    password_hash: String,
    first_name: String,
    last_name: String,
    is_active: bool,
    date_joined: DateTime<Utc>,
    last_login: Option<DateTime<Utc>>,
}

impl User {
    /// Create a new active user
    pub fn new(id: UserId, email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            password_hash: password_hash.into(),
            first_name: String::new(),
            last_name: String::new(),
            is_active: true,
            date_joined: Utc::now(),
            last_login: None,
        }
    }

    /// Set both display names at construction time
    pub fn with_names(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self
    }

    // Getters

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// First and last name joined with a space, trimmed
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn date_joined(&self) -> DateTime<Utc> {
        self.date_joined
    }

    pub fn last_login(&self) -> Option<DateTime<Utc>> {
        self.last_login
    }

    // Mutators

    pub fn set_first_name(&mut self, first_name: impl Into<String>) {
        self.first_name = first_name.into();
    }

    pub fn set_last_name(&mut self, last_name: impl Into<String>) {
        self.last_name = last_name.into();
    }

    /// Record a successful login
    pub fn record_login(&mut self) {
        self.last_login = Some(Utc::now());
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    pub fn activate(&mut self) {
        self.is_active = true;
    }
}

impl From<StoredUser> for User {
    fn from(stored: StoredUser) -> Self {
        Self {
            id: stored.id,
            email: stored.email,
            password_hash: stored.password_hash,
            first_name: stored.first_name,
            last_name: stored.last_name,
            is_active: stored.is_active,
            date_joined: stored.date_joined,
            last_login: stored.last_login,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user(email: &str) -> User {
        User::new(UserId::generate(), email, "hashed_password")
    }

    #[test]
    fn test_user_id_generate_is_uuid() {
        let id = UserId::generate();
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }

    #[test]
    fn test_user_id_parse() {
        let id = UserId::parse("6f1c2a3e-0d2b-4c55-9a1e-5b7f0c3d9e21").unwrap();
        assert_eq!(id.as_str(), "6f1c2a3e-0d2b-4c55-9a1e-5b7f0c3d9e21");
    }

    #[test]
    fn test_user_id_parse_invalid() {
        assert!(UserId::parse("").is_err());
        assert!(UserId::parse("admin").is_err());
        assert!(UserId::parse("6f1c2a3e-0d2b").is_err());
    }

    #[test]
    fn test_user_creation() {
        let user = create_test_user("a@b.com");

        assert_eq!(user.email(), "a@b.com");
        assert_eq!(user.password_hash(), "hashed_password");
        assert!(user.is_active());
        assert!(user.last_login().is_none());
        assert_eq!(user.first_name(), "");
        assert_eq!(user.full_name(), "");
    }

    #[test]
    fn test_full_name() {
        let user = create_test_user("a@b.com").with_names("Ada", "Lovelace");
        assert_eq!(user.full_name(), "Ada Lovelace");

        let only_first = create_test_user("a@b.com").with_names("Ada", "");
        assert_eq!(only_first.full_name(), "Ada");
    }

    #[test]
    fn test_record_login() {
        let mut user = create_test_user("a@b.com");
        user.record_login();
        assert!(user.last_login().is_some());
    }

    #[test]
    fn test_deactivate_and_activate() {
        let mut user = create_test_user("a@b.com");

        user.deactivate();
        assert!(!user.is_active());

        user.activate();
        assert!(user.is_active());
    }

    #[test]
    fn test_user_serialization_excludes_password() {
        let user = create_test_user("a@b.com");

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("hashed_password"));
        assert!(!json.contains("password_hash"));
    }

    #[test]
    fn test_restore_from_stored() {
        let id = UserId::generate();
        let joined = Utc::now() - chrono::Duration::days(3);
        let user: User = StoredUser {
            id: id.clone(),
            email: "a@b.com".to_string(),
            password_hash: "hash".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            is_active: false,
            date_joined: joined,
            last_login: None,
        }
        .into();

        assert_eq!(user.id(), &id);
        assert!(!user.is_active());
        assert_eq!(user.date_joined(), joined);
    }
}
