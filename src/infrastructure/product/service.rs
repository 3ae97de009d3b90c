//! Product catalog service

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::domain::product::{
    validate_category, validate_description, validate_name, validate_sku,
    validate_stock_quantity, Price, Product, ProductId, ProductRepository,
    ProductValidationError,
};
use crate::domain::{DomainError, FieldErrors};

pub const DUPLICATE_SKU: &str = "A product with this SKU already exists.";
pub const PRODUCT_NOT_FOUND: &str = "Product not found";

/// Raw product fields as supplied by a client.
///
/// Price and stock stay untyped so that a malformed value is reported as a
/// field error alongside every other problem in the request.
#[derive(Debug, Clone, Default)]
pub struct ProductFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Value>,
    pub stock_quantity: Option<Value>,
    pub category: Option<String>,
    pub sku: Option<String>,
    pub is_active: Option<bool>,
}

/// Stock availability for a single active product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockInfo {
    pub product_id: String,
    pub stock_quantity: i64,
    pub in_stock: bool,
    pub available: bool,
}

impl From<&Product> for StockInfo {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.id().to_string(),
            stock_quantity: product.stock_quantity(),
            in_stock: product.in_stock(),
            available: product.is_available(),
        }
    }
}

/// Field values that passed validation
#[derive(Debug, Default)]
struct Changes {
    name: Option<String>,
    description: Option<String>,
    price: Option<Price>,
    stock_quantity: Option<i64>,
    category: Option<String>,
    sku: Option<String>,
    is_active: Option<bool>,
}

impl Changes {
    fn apply(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.set_name(name);
        }
        if let Some(description) = self.description {
            product.set_description(description);
        }
        if let Some(price) = self.price {
            product.set_price(price);
        }
        if let Some(stock_quantity) = self.stock_quantity {
            product.set_stock_quantity(stock_quantity);
        }
        if let Some(category) = self.category {
            product.set_category(category);
        }
        if let Some(sku) = self.sku {
            product.set_sku(sku);
        }
        if let Some(is_active) = self.is_active {
            product.set_active(is_active);
        }
    }

    fn into_product(self) -> Result<Product, DomainError> {
        let (Some(name), Some(price), Some(stock_quantity), Some(category), Some(sku)) = (
            self.name,
            self.price,
            self.stock_quantity,
            self.category,
            self.sku,
        ) else {
            return Err(DomainError::internal("Validated product is missing a field"));
        };

        Ok(
            Product::new(ProductId::generate(), name, price, stock_quantity, category, sku)
                .with_description(self.description.unwrap_or_default())
                .with_active(self.is_active.unwrap_or(true)),
        )
    }
}

/// How strictly a request is validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Every required field must be present
    Full,
    /// Only supplied fields are checked
    Partial,
}

/// Product service for catalog operations
#[derive(Debug)]
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Create a new product
    pub async fn create(&self, fields: ProductFields) -> Result<Product, DomainError> {
        let changes = self.validate(fields, Mode::Full, None).await?;
        let product = changes.into_product()?;

        let product = self
            .repository
            .create(product)
            .await
            .map_err(duplicate_sku)?;

        info!(product_id = %product.id(), sku = %product.sku(), "Product created");

        Ok(product)
    }

    /// Get a product by ID, active or not
    pub async fn get(&self, id: &str) -> Result<Product, DomainError> {
        let id = parse_id(id)?;

        self.repository
            .get(&id)
            .await?
            .ok_or_else(|| DomainError::not_found(PRODUCT_NOT_FOUND))
    }

    /// Full update; every required field must be supplied
    pub async fn replace(&self, id: &str, fields: ProductFields) -> Result<Product, DomainError> {
        self.update(id, fields, Mode::Full).await
    }

    /// Partial update; only supplied fields change
    pub async fn patch(&self, id: &str, fields: ProductFields) -> Result<Product, DomainError> {
        self.update(id, fields, Mode::Partial).await
    }

    /// Soft delete by clearing the active flag
    pub async fn soft_delete(&self, id: &str) -> Result<(), DomainError> {
        let mut product = self.get(id).await?;
        product.deactivate();

        self.repository.update(product).await?;

        info!(product_id = %id, "Product deactivated");

        Ok(())
    }

    /// Stock availability; inactive products are reported as missing
    pub async fn stock(&self, id: &str) -> Result<StockInfo, DomainError> {
        let product = self.get(id).await?;

        if !product.is_active() {
            return Err(DomainError::not_found(PRODUCT_NOT_FOUND));
        }

        Ok(StockInfo::from(&product))
    }

    async fn update(&self, id: &str, fields: ProductFields, mode: Mode) -> Result<Product, DomainError> {
        let mut product = self.get(id).await?;

        let mut changes = self.validate(fields, mode, Some(product.id())).await?;
        if mode == Mode::Full && changes.is_active.is_none() {
            changes.is_active = Some(true);
        }
        changes.apply(&mut product);

        let product = self
            .repository
            .update(product)
            .await
            .map_err(duplicate_sku)?;

        debug!(product_id = %product.id(), "Product updated");

        Ok(product)
    }

    async fn validate(
        &self,
        fields: ProductFields,
        mode: Mode,
        current: Option<&ProductId>,
    ) -> Result<Changes, DomainError> {
        let required = mode == Mode::Full;
        let mut errors = FieldErrors::new();

        let changes = Changes {
            name: check(&mut errors, fields.name, "name", required, |v| validate_name(&v)),
            description: check(&mut errors, fields.description, "description", false, |v| {
                validate_description(&v)
            }),
            price: check(&mut errors, fields.price, "price", required, |v| {
                Price::from_json(&v)
            }),
            stock_quantity: check(
                &mut errors,
                fields.stock_quantity,
                "stockQuantity",
                required,
                |v| parse_stock(&v),
            ),
            category: check(&mut errors, fields.category, "category", required, |v| {
                validate_category(&v)
            }),
            sku: check(&mut errors, fields.sku, "sku", required, |v| validate_sku(&v)),
            is_active: fields.is_active,
        };

        if let Some(sku) = &changes.sku {
            if let Some(existing) = self.repository.get_by_sku(sku).await? {
                if Some(existing.id()) != current {
                    push(&mut errors, "sku", DUPLICATE_SKU);
                }
            }
        }

        if errors.is_empty() {
            Ok(changes)
        } else {
            Err(DomainError::fields(errors))
        }
    }
}

fn parse_id(id: &str) -> Result<ProductId, DomainError> {
    ProductId::parse(id).map_err(|_| DomainError::not_found(PRODUCT_NOT_FOUND))
}

fn parse_stock(value: &Value) -> Result<i64, ProductValidationError> {
    let invalid = || ProductValidationError::InvalidInteger("stockQuantity");

    let quantity = match value {
        Value::Number(number) => match number.as_i64() {
            Some(quantity) => quantity,
            None => number
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() <= i64::MAX as f64)
                .map(|f| f as i64)
                .ok_or_else(invalid)?,
        },
        Value::String(raw) => raw.trim().parse().map_err(|_| invalid())?,
        _ => return Err(invalid()),
    };

    validate_stock_quantity(quantity)
}

fn check<T, U>(
    errors: &mut FieldErrors,
    value: Option<T>,
    field: &'static str,
    required: bool,
    validate: impl FnOnce(T) -> Result<U, ProductValidationError>,
) -> Option<U> {
    let result = match value {
        Some(value) => validate(value).map(Some),
        None if required => Err(ProductValidationError::Required(field)),
        None => Ok(None),
    };

    result.unwrap_or_else(|e| {
        push(errors, e.field(), e.to_string());
        None
    })
}

fn push(errors: &mut FieldErrors, field: &str, message: impl Into<String>) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.into());
}

fn duplicate_sku(error: DomainError) -> DomainError {
    match error {
        DomainError::Conflict { .. } => DomainError::conflict(DUPLICATE_SKU),
        other => other,
    }
}
