//! Catalog endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::api::middleware::RequireIdentity;
use crate::api::state::ProductAppState;
use crate::api::types::{ApiError, Json};
use crate::domain::Product;
use crate::infrastructure::product::{ProductFields, StockInfo};

pub fn create_products_router() -> Router<ProductAppState> {
    Router::new()
        .route("/products", post(create_product))
        .route(
            "/products/{id}",
            get(get_product)
                .put(replace_product)
                .patch(patch_product)
                .delete(delete_product),
        )
        .route("/products/{id}/stock", get(product_stock))
}

/// Product body for create, PUT and PATCH.
///
/// Price and stock accept numbers or numeric strings.
#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductApiRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Value>,
    pub stock_quantity: Option<Value>,
    pub category: Option<String>,
    pub sku: Option<String>,
    pub is_active: Option<bool>,
}

impl From<ProductApiRequest> for ProductFields {
    fn from(request: ProductApiRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            price: request.price,
            stock_quantity: request.stock_quantity,
            category: request.category,
            sku: request.sku,
            is_active: request.is_active,
        }
    }
}

/// POST /products
pub async fn create_product(
    RequireIdentity(principal): RequireIdentity,
    State(state): State<ProductAppState>,
    Json(request): Json<ProductApiRequest>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    debug!(user_id = %principal.user_id, "Creating product");

    let product = state.product_service.create(request.into()).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /products/{id}
pub async fn get_product(
    State(state): State<ProductAppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(state.product_service.get(&id).await?))
}

/// PUT /products/{id}
pub async fn replace_product(
    RequireIdentity(_): RequireIdentity,
    State(state): State<ProductAppState>,
    Path(id): Path<String>,
    Json(request): Json<ProductApiRequest>,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(state.product_service.replace(&id, request.into()).await?))
}

/// PATCH /products/{id}
pub async fn patch_product(
    RequireIdentity(_): RequireIdentity,
    State(state): State<ProductAppState>,
    Path(id): Path<String>,
    Json(request): Json<ProductApiRequest>,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(state.product_service.patch(&id, request.into()).await?))
}

/// DELETE /products/{id}
pub async fn delete_product(
    RequireIdentity(principal): RequireIdentity,
    State(state): State<ProductAppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    debug!(user_id = %principal.user_id, product_id = %id, "Deleting product");

    state.product_service.soft_delete(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /products/{id}/stock; public so other services can check availability
pub async fn product_stock(
    State(state): State<ProductAppState>,
    Path(id): Path<String>,
) -> Result<Json<StockInfo>, ApiError> {
    Ok(Json(state.product_service.stock(&id).await?))
}
