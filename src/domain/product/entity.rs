//! Product entity and related types

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use uuid::Uuid;

use super::validation::{
    ProductValidationError, PRICE_DECIMAL_PLACES, PRICE_MAX_DIGITS,
};

/// Product identifier - a UUID assigned on creation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ProductId(String);

impl ProductId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Parse an identifier, rejecting anything that is not a UUID
    pub fn parse(id: impl AsRef<str>) -> Result<Self, ProductValidationError> {
        let id = id.as_ref();
        Uuid::parse_str(id)
            .map(|uuid| Self(uuid.to_string()))
            .map_err(|_| ProductValidationError::InvalidId(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monetary amount held as integer cents.
///
/// Serialized as a JSON number with two implied decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Price(i64);

impl Price {
    pub fn from_cents(cents: i64) -> Result<Self, ProductValidationError> {
        if cents < 0 {
            return Err(ProductValidationError::Negative("price"));
        }
        Ok(Self(cents))
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    /// Parse a decimal string such as `"19.99"`
    pub fn parse(raw: &str) -> Result<Self, ProductValidationError> {
        let raw = raw.trim();
        let (negative, unsigned) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw.strip_prefix('+').unwrap_or(raw)),
        };

        let (whole, fraction) = match unsigned.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (unsigned, ""),
        };

        let is_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
            return Err(ProductValidationError::InvalidPrice);
        }

        let whole = whole.trim_start_matches('0');
        let whole_digits = whole.len();
        let decimal_places = fraction.len();

        if whole_digits + decimal_places > PRICE_MAX_DIGITS {
            return Err(ProductValidationError::PriceTooManyDigits(PRICE_MAX_DIGITS));
        }
        if decimal_places > PRICE_DECIMAL_PLACES {
            return Err(ProductValidationError::PriceTooManyDecimalPlaces(
                PRICE_DECIMAL_PLACES,
            ));
        }
        if whole_digits > PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES {
            return Err(ProductValidationError::PriceTooManyWholeDigits(
                PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES,
            ));
        }

        let padded = format!("{}{:0<2}", whole, fraction);
        let cents: i64 = if padded.trim_start_matches('0').is_empty() {
            0
        } else {
            padded
                .parse()
                .map_err(|_| ProductValidationError::InvalidPrice)?
        };

        if negative && cents > 0 {
            return Err(ProductValidationError::Negative("price"));
        }

        Ok(Self(cents))
    }

    /// Parse a price from a JSON number or numeric string
    pub fn from_json(value: &serde_json::Value) -> Result<Self, ProductValidationError> {
        match value {
            serde_json::Value::Number(number) => Self::parse(&number.to_string()),
            serde_json::Value::String(raw) => Self::parse(raw),
            _ => Err(ProductValidationError::InvalidPrice),
        }
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Persisted product row, used by repositories to rebuild a [`Product`]
#[derive(Debug, Clone)]
pub struct StoredProduct {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub stock_quantity: i64,
    pub category: String,
    pub sku: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

/// Catalog product
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    id: ProductId,
    name: String,
    description: String,
    price: Price,
    stock_quantity: i64,
    category: String,
    sku: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    is_active: bool,
}

impl Product {
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        price: Price,
        stock_quantity: i64,
        category: impl Into<String>,
        sku: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            description: String::new(),
            price,
            stock_quantity,
            category: category.into(),
            sku: sku.into(),
            created_at: now,
            updated_at: now,
            is_active: true,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    // Getters

    pub fn id(&self) -> &ProductId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn stock_quantity(&self) -> i64 {
        self.stock_quantity
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }

    /// Active and in stock
    pub fn is_available(&self) -> bool {
        self.is_active && self.in_stock()
    }

    // Mutators

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.touch();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
        self.touch();
    }

    pub fn set_price(&mut self, price: Price) {
        self.price = price;
        self.touch();
    }

    pub fn set_stock_quantity(&mut self, stock_quantity: i64) {
        self.stock_quantity = stock_quantity;
        self.touch();
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.category = category.into();
        self.touch();
    }

    pub fn set_sku(&mut self, sku: impl Into<String>) {
        self.sku = sku.into();
        self.touch();
    }

    pub fn set_active(&mut self, is_active: bool) {
        self.is_active = is_active;
        self.touch();
    }

    /// Soft delete
    pub fn deactivate(&mut self) {
        self.set_active(false);
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl From<StoredProduct> for Product {
    fn from(stored: StoredProduct) -> Self {
        Self {
            id: stored.id,
            name: stored.name,
            description: stored.description,
            price: stored.price,
            stock_quantity: stored.stock_quantity,
            category: stored.category,
            sku: stored.sku,
            created_at: stored.created_at,
            updated_at: stored.updated_at,
            is_active: stored.is_active,
        }
    }
}
