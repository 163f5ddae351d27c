use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Catalog identifier. Serialized as a bare number, and as a string when used
/// as a JSON object key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for ProductId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(ProductId)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rating {
    #[serde(default)]
    pub rate: f64,
    pub count: u32,
}

/// One record of the static catalog resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogRecord {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub image: String,
    pub price: f64,
    pub rating: Rating,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub image: String,
    pub price: f64,
    /// Remaining purchasable units.
    pub stock: u32,
    pub initial_stock: u32,
}

impl Product {
    pub fn new(id: ProductId, title: impl Into<String>, price: f64, stock: u32) -> Self {
        Self {
            id,
            title: title.into(),
            image: String::new(),
            price,
            stock,
            initial_stock: stock,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.stock == 0
    }
}

impl From<CatalogRecord> for Product {
    fn from(record: CatalogRecord) -> Self {
        // rating.count 兼作庫存
        Self {
            id: record.id,
            title: record.title,
            image: record.image,
            price: record.price,
            stock: record.rating.count,
            initial_stock: record.rating.count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityDelta {
    Increment,
    Decrement,
}

impl QuantityDelta {
    pub fn as_i64(self) -> i64 {
        match self {
            QuantityDelta::Increment => 1,
            QuantityDelta::Decrement => -1,
        }
    }
}

/// Persisted cart line: the product snapshot plus its quantity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredLine {
    pub id: ProductId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub price: f64,
    pub quantity: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            message: message.into(),
        }
    }

    pub fn is_warning(&self) -> bool {
        self.level == NotificationLevel::Warning
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            NotificationLevel::Info => write!(f, "✅ {}", self.message),
            NotificationLevel::Warning => write!(f, "⚠️  {}", self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_record_count_becomes_stock() {
        let record: CatalogRecord = serde_json::from_value(serde_json::json!({
            "id": 1,
            "title": "Fjallraven Backpack",
            "price": 109.95,
            "description": "ignored",
            "category": "men's clothing",
            "image": "https://example.com/1.jpg",
            "rating": {"rate": 3.9, "count": 120}
        }))
        .unwrap();

        let product = Product::from(record);
        assert_eq!(product.id, ProductId(1));
        assert_eq!(product.stock, 120);
        assert_eq!(product.initial_stock, 120);
        assert_eq!(product.image, "https://example.com/1.jpg");
    }

    #[test]
    fn test_product_id_parses_from_text() {
        assert_eq!(" 42 ".parse::<ProductId>().unwrap(), ProductId(42));
        assert!("abc".parse::<ProductId>().is_err());
    }
}
