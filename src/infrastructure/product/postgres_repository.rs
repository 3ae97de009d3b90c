//! PostgreSQL product repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::product::{Price, Product, ProductId, ProductRepository, StoredProduct};
use crate::domain::DomainError;
use crate::infrastructure::storage::is_unique_violation;

const PRODUCT_COLUMNS: &str = "id, name, description, price_cents, stock_quantity, category, sku, \
                               created_at, updated_at, is_active";

/// PostgreSQL implementation of ProductRepository
#[derive(Debug, Clone)]
pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(
        &self,
        column: &str,
        value: &str,
    ) -> Result<Option<Product>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM products WHERE {} = $1",
            PRODUCT_COLUMNS, column
        ))
        .bind(value)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get product: {}", e)))?;

        row.as_ref().map(row_to_product).transpose()
    }
}

fn write_error(action: &str, sku: &str, e: sqlx::Error) -> DomainError {
    if is_unique_violation(&e) {
        DomainError::conflict(format!("Product with SKU '{}' already exists", sku))
    } else {
        DomainError::storage(format!("Failed to {} product: {}", action, e))
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn get(&self, id: &ProductId) -> Result<Option<Product>, DomainError> {
        self.fetch_one_where("id", id.as_str()).await
    }

    async fn get_by_sku(&self, sku: &str) -> Result<Option<Product>, DomainError> {
        self.fetch_one_where("sku", sku).await
    }

    async fn create(&self, product: Product) -> Result<Product, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price_cents, stock_quantity,
                                  category, sku, created_at, updated_at, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(product.id().as_str())
        .bind(product.name())
        .bind(product.description())
        .bind(product.price().cents())
        .bind(product.stock_quantity())
        .bind(product.category())
        .bind(product.sku())
        .bind(product.created_at())
        .bind(product.updated_at())
        .bind(product.is_active())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("create", product.sku(), e))?;

        Ok(product)
    }

    async fn update(&self, product: Product) -> Result<Product, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = $2, description = $3, price_cents = $4, stock_quantity = $5,
                category = $6, sku = $7, updated_at = $8, is_active = $9
            WHERE id = $1
            "#,
        )
        .bind(product.id().as_str())
        .bind(product.name())
        .bind(product.description())
        .bind(product.price().cents())
        .bind(product.stock_quantity())
        .bind(product.category())
        .bind(product.sku())
        .bind(product.updated_at())
        .bind(product.is_active())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("update", product.sku(), e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Product '{}' not found",
                product.id()
            )));
        }

        Ok(product)
    }
}

fn row_to_product(row: &sqlx::postgres::PgRow) -> Result<Product, DomainError> {
    let id: String = row.try_get("id").map_err(column_error)?;
    let id = ProductId::parse(&id)
        .map_err(|e| DomainError::storage(format!("Invalid product ID in database: {}", e)))?;

    let cents: i64 = row.try_get("price_cents").map_err(column_error)?;
    let price = Price::from_cents(cents)
        .map_err(|e| DomainError::storage(format!("Invalid price in database: {}", e)))?;

    Ok(StoredProduct {
        id,
        name: row.try_get("name").map_err(column_error)?,
        description: row.try_get("description").map_err(column_error)?,
        price,
        stock_quantity: row.try_get("stock_quantity").map_err(column_error)?,
        category: row.try_get("category").map_err(column_error)?,
        sku: row.try_get("sku").map_err(column_error)?,
        created_at: row.try_get("created_at").map_err(column_error)?,
        updated_at: row.try_get("updated_at").map_err(column_error)?,
        is_active: row.try_get("is_active").map_err(column_error)?,
    }
    .into())
}

fn column_error(e: sqlx::Error) -> DomainError {
    DomainError::storage(format!("Failed to read product row: {}", e))
}
