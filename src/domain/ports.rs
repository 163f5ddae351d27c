use crate::domain::model::Product;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Durable string key/value store, the local equivalent of browser storage.
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn catalog_source(&self) -> &str;
    fn storage_path(&self) -> &str;
    fn storage_key(&self) -> &str;
    fn request_timeout_seconds(&self) -> Option<u64>;
    fn currency(&self) -> &str;
}

#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Where the catalog comes from, for logs and error messages.
    fn location(&self) -> &str;

    async fn fetch_products(&self) -> Result<Vec<Product>>;
}
