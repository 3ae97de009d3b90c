//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<String, User>,
    /// email -> user ID
    email_index: HashMap<String, String>,
}

/// In-memory implementation of UserRepository
///
/// Both maps live behind one lock so the email uniqueness check and the
/// insert happen atomically.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository with initial users
    pub fn with_users(users: Vec<User>) -> Self {
        let mut tables = Tables::default();

        for user in users {
            let id = user.id().as_str().to_string();
            tables.email_index.insert(user.email().to_string(), id.clone());
            tables.users.insert(id, user);
        }

        Self {
            tables: Arc::new(RwLock::new(tables)),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(id.as_str()).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let tables = self.tables.read().await;

        Ok(tables
            .email_index
            .get(email)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut tables = self.tables.write().await;

        let id = user.id().as_str().to_string();
        let email = user.email().to_string();

        if tables.users.contains_key(&id) {
            return Err(DomainError::conflict(format!(
                "User with ID '{}' already exists",
                id
            )));
        }

        if tables.email_index.contains_key(&email) {
            return Err(DomainError::conflict(format!(
                "User with email '{}' already exists",
                email
            )));
        }

        tables.email_index.insert(email, id.clone());
        tables.users.insert(id, user.clone());

        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let mut tables = self.tables.write().await;
        let id = user.id().as_str().to_string();

        let Some(existing) = tables.users.get(&id) else {
            return Err(DomainError::not_found(format!("User '{}' not found", id)));
        };

        let old_email = existing.email().to_string();
        let new_email = user.email().to_string();

        if old_email != new_email {
            if tables.email_index.contains_key(&new_email) {
                return Err(DomainError::conflict(format!(
                    "User with email '{}' already exists",
                    new_email
                )));
            }

            tables.email_index.remove(&old_email);
            tables.email_index.insert(new_email, id.clone());
        }

        tables.users.insert(id, user.clone());

        Ok(user.clone())
    }

    async fn record_login(&self, id: &UserId) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;

        match tables.users.get_mut(id.as_str()) {
            Some(user) => {
                user.record_login();
                Ok(())
            }
            None => Err(DomainError::not_found(format!("User '{}' not found", id))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user(email: &str) -> User {
        User::new(UserId::generate(), email, "hashed_password")
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryUserRepository::new();
        let user = create_test_user("a@b.com");

        repo.create(user.clone()).await.unwrap();

        let retrieved = repo.get(user.id()).await.unwrap().unwrap();
        assert_eq!(retrieved.email(), "a@b.com");
    }

    #[tokio::test]
    async fn test_get_by_email() {
        let repo = InMemoryUserRepository::with_users(vec![create_test_user("a@b.com")]);

        assert!(repo.get_by_email("a@b.com").await.unwrap().is_some());
        assert!(repo.get_by_email("c@d.com").await.unwrap().is_none());
        assert!(repo.email_exists("a@b.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let repo = InMemoryUserRepository::new();

        repo.create(create_test_user("a@b.com")).await.unwrap();
        let result = repo.create(create_test_user("a@b.com")).await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_concurrent_creates_with_same_email() {
        let repo = Arc::new(InMemoryUserRepository::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.create(create_test_user("race@b.com")).await })
            })
            .collect();

        let mut successes = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(DomainError::Conflict { .. }) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(conflicts, 7);
    }

    #[tokio::test]
    async fn test_update() {
        let repo = InMemoryUserRepository::new();
        let mut user = create_test_user("a@b.com");
        repo.create(user.clone()).await.unwrap();

        user.set_first_name("Ada");
        repo.update(&user).await.unwrap();

        let retrieved = repo.get(user.id()).await.unwrap().unwrap();
        assert_eq!(retrieved.first_name(), "Ada");
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let repo = InMemoryUserRepository::new();
        let result = repo.update(&create_test_user("a@b.com")).await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_record_login() {
        let repo = InMemoryUserRepository::new();
        let user = create_test_user("a@b.com");
        repo.create(user.clone()).await.unwrap();

        repo.record_login(user.id()).await.unwrap();

        let retrieved = repo.get(user.id()).await.unwrap().unwrap();
        assert!(retrieved.last_login().is_some());
    }
}
