//! Product validation utilities

use thiserror::Error;

/// Errors that can occur during product validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProductValidationError {
    #[error("'{0}' is not a valid product ID")]
    InvalidId(String),

    #[error("Product name cannot be empty.")]
    EmptyName,

    #[error("This field may not be blank.")]
    Blank(&'static str),

    #[error("This field is required.")]
    Required(&'static str),

    #[error("Ensure this field has no more than {1} characters.")]
    TooLong(&'static str, usize),

    #[error("A valid number is required.")]
    InvalidPrice,

    #[error("Ensure that there are no more than {0} digits in total.")]
    PriceTooManyDigits(usize),

    #[error("Ensure that there are no more than {0} decimal places.")]
    PriceTooManyDecimalPlaces(usize),

    #[error("Ensure that there are no more than {0} digits before the decimal point.")]
    PriceTooManyWholeDigits(usize),

    #[error("Ensure this value is greater than or equal to 0.")]
    Negative(&'static str),

    #[error("A valid integer is required.")]
    InvalidInteger(&'static str),
}

impl ProductValidationError {
    /// Name of the request field the error belongs to
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidId(_) => "id",
            Self::EmptyName => "name",
            Self::InvalidPrice
            | Self::PriceTooManyDigits(_)
            | Self::PriceTooManyDecimalPlaces(_)
            | Self::PriceTooManyWholeDigits(_) => "price",
            Self::Blank(field)
            | Self::Required(field)
            | Self::TooLong(field, _)
            | Self::Negative(field)
            | Self::InvalidInteger(field) => field,
        }
    }
}

pub const MAX_NAME_LENGTH: usize = 200;
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;
pub const MAX_CATEGORY_LENGTH: usize = 100;
pub const MAX_SKU_LENGTH: usize = 100;
pub const PRICE_MAX_DIGITS: usize = 10;
pub const PRICE_DECIMAL_PLACES: usize = 2;
const MAX_STOCK_QUANTITY: i64 = i32::MAX as i64;

/// Validate a product name and return the trimmed value
pub fn validate_name(name: &str) -> Result<String, ProductValidationError> {
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ProductValidationError::TooLong("name", MAX_NAME_LENGTH));
    }

    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ProductValidationError::EmptyName);
    }

    Ok(trimmed.to_string())
}

/// Validate an optional description; blank is allowed
pub fn validate_description(description: &str) -> Result<String, ProductValidationError> {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(ProductValidationError::TooLong(
            "description",
            MAX_DESCRIPTION_LENGTH,
        ));
    }

    Ok(description.trim().to_string())
}

pub fn validate_category(category: &str) -> Result<String, ProductValidationError> {
    validate_required_text("category", category, MAX_CATEGORY_LENGTH)
}

pub fn validate_sku(sku: &str) -> Result<String, ProductValidationError> {
    validate_required_text("sku", sku, MAX_SKU_LENGTH)
}

fn validate_required_text(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<String, ProductValidationError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(ProductValidationError::Blank(field));
    }

    if trimmed.chars().count() > max {
        return Err(ProductValidationError::TooLong(field, max));
    }

    Ok(trimmed.to_string())
}

/// Validate a stock quantity
pub fn validate_stock_quantity(quantity: i64) -> Result<i64, ProductValidationError> {
    if quantity < 0 {
        return Err(ProductValidationError::Negative("stockQuantity"));
    }

    if quantity > MAX_STOCK_QUANTITY {
        return Err(ProductValidationError::InvalidInteger("stockQuantity"));
    }

    Ok(quantity)
}
