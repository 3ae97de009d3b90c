//! Storefront services
//!
//! A user-account service and a product catalog service sharing one
//! cookie-based JWT authentication scheme:
//! - Registration, login, refresh and logout with HTTP-only token cookies
//! - Cookie-then-bearer token resolution for authenticated endpoints
//! - Product CRUD with soft delete and a public stock check

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::{ProductAppState, UserAppState};
use config::{AuthConfig, StorageBackend};
use domain::{DomainError, ProductRepository, UserRepository};
use infrastructure::{
    auth::{
        ClaimsIdentityProvider, CookieManager, JwtService, TokenIssuer, TokenResolver,
        UserIdentityProvider,
    },
    product::{InMemoryProductRepository, PostgresProductRepository, ProductService},
    storage::{connect_pool, product_migrations, run_migrations, user_migrations, PostgresConfig},
    user::{Argon2Hasher, InMemoryUserRepository, PostgresUserRepository, UserService},
};
use tracing::info;

/// Build the token issuer; an empty secret or bad lifetime is fatal
pub fn create_token_issuer(auth: &AuthConfig) -> Result<Arc<dyn TokenIssuer>, DomainError> {
    Ok(Arc::new(JwtService::new(auth.jwt_config())?))
}

/// Account service state over the given repository
pub fn create_user_state_with_repository<R>(
    repository: Arc<R>,
    auth: &AuthConfig,
) -> Result<UserAppState, DomainError>
where
    R: UserRepository + 'static,
{
    let issuer = create_token_issuer(auth)?;
    let cookies = CookieManager::new(auth.cookie_policy());

    let resolver = TokenResolver::cookie_then_header(
        auth.access_cookie_name.clone(),
        issuer.clone(),
        Arc::new(UserIdentityProvider::new(repository.clone())),
    );

    let user_service = UserService::new(repository, Arc::new(Argon2Hasher::new()), issuer);

    Ok(UserAppState {
        user_service: Arc::new(user_service),
        resolver: Arc::new(resolver),
        cookies: Arc::new(cookies),
    })
}

/// Catalog service state over the given repository
pub fn create_product_state_with_repository<R>(
    repository: Arc<R>,
    auth: &AuthConfig,
) -> Result<ProductAppState, DomainError>
where
    R: ProductRepository + 'static,
{
    let issuer = create_token_issuer(auth)?;

    let resolver = TokenResolver::cookie_then_header(
        auth.access_cookie_name.clone(),
        issuer,
        Arc::new(ClaimsIdentityProvider),
    );

    Ok(ProductAppState {
        product_service: Arc::new(ProductService::new(repository)),
        resolver: Arc::new(resolver),
    })
}

/// Account service state for the configured storage backend
pub async fn create_user_state(config: &AppConfig) -> anyhow::Result<UserAppState> {
    let state = match config.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory user storage");
            create_user_state_with_repository(Arc::new(InMemoryUserRepository::new()), &config.auth)?
        }
        StorageBackend::Postgres => {
            let pool = connect_pool(&PostgresConfig::new(config.storage.database_url()?)).await?;
            run_migrations(&pool, user_migrations()).await?;
            info!("Using PostgreSQL user storage");
            create_user_state_with_repository(
                Arc::new(PostgresUserRepository::new(pool)),
                &config.auth,
            )?
        }
    };

    Ok(state)
}

/// Catalog service state for the configured storage backend
pub async fn create_product_state(config: &AppConfig) -> anyhow::Result<ProductAppState> {
    let state = match config.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory product storage");
            create_product_state_with_repository(
                Arc::new(InMemoryProductRepository::new()),
                &config.auth,
            )?
        }
        StorageBackend::Postgres => {
            let pool = connect_pool(&PostgresConfig::new(config.storage.database_url()?)).await?;
            run_migrations(&pool, product_migrations()).await?;
            info!("Using PostgreSQL product storage");
            create_product_state_with_repository(
                Arc::new(PostgresProductRepository::new(pool)),
                &config.auth,
            )?
        }
    };

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_secret_is_fatal() {
        let auth = AuthConfig::default();

        let result =
            create_user_state_with_repository(Arc::new(InMemoryUserRepository::new()), &auth);

        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_states_build_with_secret() {
        let auth = AuthConfig {
            jwt_secret: "lib-test-secret".to_string(),
            ..Default::default()
        };

        assert!(
            create_user_state_with_repository(Arc::new(InMemoryUserRepository::new()), &auth)
                .is_ok()
        );
        assert!(create_product_state_with_repository(
            Arc::new(InMemoryProductRepository::new()),
            &auth
        )
        .is_ok());
    }
}
