//! Application state for the two services

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::product::{Product, ProductRepository};
use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::auth::{CookieManager, Principal, TokenPair, TokenResolver};
use crate::infrastructure::product::{ProductFields, ProductService, StockInfo};
use crate::infrastructure::user::{PasswordHasher, ProfileUpdate, RegisterRequest, UserService};

/// State for the account service
#[derive(Clone)]
pub struct UserAppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub resolver: Arc<TokenResolver<User>>,
    pub cookies: Arc<CookieManager>,
}

/// State for the catalog service
#[derive(Clone)]
pub struct ProductAppState {
    pub product_service: Arc<dyn ProductServiceTrait>,
    pub resolver: Arc<TokenResolver<Principal>>,
}

/// Trait for account operations
#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn register(&self, request: RegisterRequest) -> Result<(User, TokenPair), DomainError>;
    async fn login(&self, email: &str, password: &str) -> Result<(User, TokenPair), DomainError>;
    async fn refresh(&self, refresh_token: &str) -> Result<String, DomainError>;
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError>;
    async fn update_profile(&self, id: &UserId, update: ProfileUpdate)
        -> Result<User, DomainError>;
}

/// Trait for catalog operations
#[async_trait]
pub trait ProductServiceTrait: Send + Sync {
    async fn create(&self, fields: ProductFields) -> Result<Product, DomainError>;
    async fn get(&self, id: &str) -> Result<Product, DomainError>;
    async fn replace(&self, id: &str, fields: ProductFields) -> Result<Product, DomainError>;
    async fn patch(&self, id: &str, fields: ProductFields) -> Result<Product, DomainError>;
    async fn soft_delete(&self, id: &str) -> Result<(), DomainError>;
    async fn stock(&self, id: &str) -> Result<StockInfo, DomainError>;
}

#[async_trait]
impl<R, H> UserServiceTrait for UserService<R, H>
where
    R: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn register(&self, request: RegisterRequest) -> Result<(User, TokenPair), DomainError> {
        UserService::register(self, request).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<(User, TokenPair), DomainError> {
        UserService::login(self, email, password).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<String, DomainError> {
        UserService::refresh(self, refresh_token).await
    }

    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        UserService::get(self, id).await
    }

    async fn update_profile(
        &self,
        id: &UserId,
        update: ProfileUpdate,
    ) -> Result<User, DomainError> {
        UserService::update_profile(self, id, update).await
    }
}

#[async_trait]
impl<R: ProductRepository + 'static> ProductServiceTrait for ProductService<R> {
    async fn create(&self, fields: ProductFields) -> Result<Product, DomainError> {
        ProductService::create(self, fields).await
    }

    async fn get(&self, id: &str) -> Result<Product, DomainError> {
        ProductService::get(self, id).await
    }

    async fn replace(&self, id: &str, fields: ProductFields) -> Result<Product, DomainError> {
        ProductService::replace(self, id, fields).await
    }

    async fn patch(&self, id: &str, fields: ProductFields) -> Result<Product, DomainError> {
        ProductService::patch(self, id, fields).await
    }

    async fn soft_delete(&self, id: &str) -> Result<(), DomainError> {
        ProductService::soft_delete(self, id).await
    }

    async fn stock(&self, id: &str) -> Result<StockInfo, DomainError> {
        ProductService::stock(self, id).await
    }
}
