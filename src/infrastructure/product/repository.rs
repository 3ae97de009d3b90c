//! In-memory product repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::product::{Product, ProductId, ProductRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct Tables {
    products: HashMap<String, Product>,
    /// sku -> product ID
    sku_index: HashMap<String, String>,
}

/// In-memory implementation of ProductRepository
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        let mut tables = Tables::default();

        for product in products {
            let id = product.id().as_str().to_string();
            tables.sku_index.insert(product.sku().to_string(), id.clone());
            tables.products.insert(id, product);
        }

        Self {
            tables: Arc::new(RwLock::new(tables)),
        }
    }
}

fn duplicate_sku(sku: &str) -> DomainError {
    DomainError::conflict(format!("Product with SKU '{}' already exists", sku))
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn get(&self, id: &ProductId) -> Result<Option<Product>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.products.get(id.as_str()).cloned())
    }

    async fn get_by_sku(&self, sku: &str) -> Result<Option<Product>, DomainError> {
        let tables = self.tables.read().await;

        Ok(tables
            .sku_index
            .get(sku)
            .and_then(|id| tables.products.get(id))
            .cloned())
    }

    async fn create(&self, product: Product) -> Result<Product, DomainError> {
        let mut tables = self.tables.write().await;
        let id = product.id().as_str().to_string();

        if tables.products.contains_key(&id) {
            return Err(DomainError::conflict(format!(
                "Product with ID '{}' already exists",
                id
            )));
        }

        if tables.sku_index.contains_key(product.sku()) {
            return Err(duplicate_sku(product.sku()));
        }

        tables.sku_index.insert(product.sku().to_string(), id.clone());
        tables.products.insert(id, product.clone());

        Ok(product)
    }

    async fn update(&self, product: Product) -> Result<Product, DomainError> {
        let mut tables = self.tables.write().await;
        let id = product.id().as_str().to_string();

        let Some(existing) = tables.products.get(&id) else {
            return Err(DomainError::not_found(format!("Product '{}' not found", id)));
        };

        let old_sku = existing.sku().to_string();

        if old_sku != product.sku() {
            if tables.sku_index.contains_key(product.sku()) {
                return Err(duplicate_sku(product.sku()));
            }

            tables.sku_index.remove(&old_sku);
            tables.sku_index.insert(product.sku().to_string(), id.clone());
        }

        tables.products.insert(id, product.clone());

        Ok(product)
    }
}
