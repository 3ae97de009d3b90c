//! Product repository trait

use async_trait::async_trait;

use super::entity::{Product, ProductId};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Repository for product persistence
///
/// SKU uniqueness is enforced by the store: `create` and `update` return
/// `DomainError::Conflict` when another product already holds the SKU.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Finds a product by ID, active or not
    async fn get(&self, id: &ProductId) -> Result<Option<Product>, DomainError>;

    /// Finds a product by SKU
    async fn get_by_sku(&self, sku: &str) -> Result<Option<Product>, DomainError>;

    /// Creates a new product
    async fn create(&self, product: Product) -> Result<Product, DomainError>;

    /// Updates an existing product
    async fn update(&self, product: Product) -> Result<Product, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::Price;

    fn create_test_product() -> Product {
        Product::new(
            ProductId::generate(),
            "Widget",
            Price::from_cents(100).unwrap(),
            1,
            "Tools",
            "SKU-1",
        )
    }

    #[tokio::test]
    async fn test_mock_product_repository() {
        let mut mock = MockProductRepository::new();
        let product = create_test_product();
        let expected = product.clone();

        mock.expect_get()
            .returning(move |_| Ok(Some(expected.clone())));

        let result = mock.get(product.id()).await.unwrap();
        assert_eq!(result, Some(product));
    }

    #[tokio::test]
    async fn test_mock_conflict() {
        let mut mock = MockProductRepository::new();

        mock.expect_create()
            .returning(|_| Err(DomainError::conflict("SKU taken")));

        let result = mock.create(create_test_product()).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }
}
