//! Product catalog domain

mod entity;
mod repository;
mod validation;

pub use entity::{Price, Product, ProductId, StoredProduct};
pub use repository::ProductRepository;
pub use validation::{
    validate_category, validate_description, validate_name, validate_sku,
    validate_stock_quantity, ProductValidationError,
};

#[cfg(test)]
pub use repository::MockProductRepository;
