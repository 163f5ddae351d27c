use crate::domain::model::ProductId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShopError {
    #[error("Stock limit reached for {title} (product {product_id})")]
    StockExceeded { product_id: ProductId, title: String },

    #[error("Unknown product: {product_id}")]
    UnknownProduct { product_id: ProductId },

    #[error("Product {product_id} is not in the cart")]
    NotInCart { product_id: ProductId },

    #[error("Stock drift for product {product_id}: expected {expected} units, found {actual}")]
    StockDrift {
        product_id: ProductId,
        expected: u32,
        actual: u32,
    },

    #[error("Failed to load catalog from {source_location}: {message}")]
    CatalogLoadError {
        source_location: String,
        message: String,
    },

    #[error("Cart storage error: {message}")]
    PersistenceError { message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid command: {message}")]
    InvalidCommand { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Stock,
    Catalog,
    Persistence,
    Configuration,
    Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ShopError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ShopError::StockExceeded { .. } | ShopError::StockDrift { .. } => ErrorCategory::Stock,
            ShopError::CatalogLoadError { .. } | ShopError::ApiError(_) => ErrorCategory::Catalog,
            ShopError::PersistenceError { .. }
            | ShopError::IoError(_)
            | ShopError::SerializationError(_) => ErrorCategory::Persistence,
            ShopError::ConfigError { .. }
            | ShopError::ConfigValidationError { .. }
            | ShopError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ShopError::UnknownProduct { .. }
            | ShopError::NotInCart { .. }
            | ShopError::InvalidCommand { .. } => ErrorCategory::Input,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 使用者操作被拒絕，狀態未改變
            ShopError::StockExceeded { .. }
            | ShopError::UnknownProduct { .. }
            | ShopError::NotInCart { .. }
            | ShopError::InvalidCommand { .. } => ErrorSeverity::Low,
            ShopError::PersistenceError { .. }
            | ShopError::IoError(_)
            | ShopError::SerializationError(_) => ErrorSeverity::Medium,
            ShopError::ConfigError { .. }
            | ShopError::ConfigValidationError { .. }
            | ShopError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            ShopError::CatalogLoadError { .. }
            | ShopError::ApiError(_)
            | ShopError::StockDrift { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ShopError::StockExceeded { title, .. } => {
                format!("Cannot add more. Stock limit reached for {}", title)
            }
            ShopError::UnknownProduct { product_id } => {
                format!("There is no product with id {}", product_id)
            }
            ShopError::NotInCart { product_id } => {
                format!("Product {} is not in your cart", product_id)
            }
            ShopError::CatalogLoadError { .. } | ShopError::ApiError(_) => {
                "The product catalog could not be loaded, nothing to display".to_string()
            }
            ShopError::StockDrift { .. } => {
                "Cart and stock levels are out of sync".to_string()
            }
            ShopError::PersistenceError { .. }
            | ShopError::IoError(_)
            | ShopError::SerializationError(_) => {
                "Your cart could not be saved or restored".to_string()
            }
            ShopError::ConfigError { .. }
            | ShopError::ConfigValidationError { .. }
            | ShopError::InvalidConfigValueError { .. } => format!("Invalid configuration: {}", self),
            ShopError::InvalidCommand { message } => message.clone(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Stock => "Lower the quantity or pick another product",
            ErrorCategory::Catalog => "Check that the catalog source is reachable and returns a JSON array of products",
            ErrorCategory::Persistence => "Check that the storage directory is writable; the cart keeps working in memory",
            ErrorCategory::Configuration => "Fix the configuration file or command-line flags and try again",
            ErrorCategory::Input => "Run `products` to list valid product ids or `help` for commands",
        }
    }
}

pub type Result<T> = std::result::Result<T, ShopError>;
