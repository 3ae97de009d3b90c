//! Catalog infrastructure: product repositories and the product service

mod postgres_repository;
mod repository;
mod service;

pub use postgres_repository::PostgresProductRepository;
pub use repository::InMemoryProductRepository;
pub use service::{ProductFields, ProductService, StockInfo, DUPLICATE_SKU, PRODUCT_NOT_FOUND};
