use axum::{middleware, Router};
use tower_http::trace::TraceLayer;

use super::health;
use super::middleware::{logging_middleware, security_headers_middleware};
use super::products;
use super::state::{ProductAppState, UserAppState};
use super::users;

pub const USER_SERVICE: &str = "user-service";
pub const PRODUCT_SERVICE: &str = "product-service";

/// Router for the account service
pub fn create_user_router(state: UserAppState) -> Router {
    Router::new()
        .merge(health::health_routes(USER_SERVICE))
        .merge(users::create_users_router())
        .with_state(state)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Router for the catalog service
pub fn create_product_router(state: ProductAppState) -> Router {
    Router::new()
        .merge(health::health_routes(PRODUCT_SERVICE))
        .merge(products::create_products_router())
        .with_state(state)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}
