use crate::domain::model::{CatalogRecord, Product};
use crate::domain::ports::CatalogSource;
use crate::utils::error::{Result, ShopError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Catalog served as a static JSON resource over http(s).
pub struct HttpCatalog {
    client: Client,
    endpoint: String,
}

impl HttpCatalog {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: Client::new(),
            endpoint,
        }
    }

    pub fn with_timeout(endpoint: String, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl CatalogSource for HttpCatalog {
    fn location(&self) -> &str {
        &self.endpoint
    }

    async fn fetch_products(&self) -> Result<Vec<Product>> {
        tracing::debug!("Making catalog request to: {}", self.endpoint);
        let response = self.client.get(&self.endpoint).send().await?;

        tracing::debug!("Catalog response status: {}", response.status());
        if !response.status().is_success() {
            return Err(ShopError::CatalogLoadError {
                source_location: self.endpoint.clone(),
                message: format!("HTTP status {}", response.status()),
            });
        }

        let body = response.text().await?;
        parse_catalog(&self.endpoint, &body)
    }
}

/// Catalog read from a JSON file on disk, e.g. `data/data.json`.
pub struct FileCatalog {
    path: String,
}

impl FileCatalog {
    pub fn new(path: String) -> Self {
        Self { path }
    }
}

#[async_trait]
impl CatalogSource for FileCatalog {
    fn location(&self) -> &str {
        &self.path
    }

    async fn fetch_products(&self) -> Result<Vec<Product>> {
        tracing::debug!("Reading catalog file: {}", self.path);
        let body = tokio::fs::read_to_string(&self.path).await?;
        parse_catalog(&self.path, &body)
    }
}

pub fn parse_catalog(location: &str, body: &str) -> Result<Vec<Product>> {
    let records: Vec<CatalogRecord> =
        serde_json::from_str(body).map_err(|e| ShopError::CatalogLoadError {
            source_location: location.to_string(),
            message: format!("invalid catalog JSON: {}", e),
        })?;

    if let Some(bad) = records.iter().find(|r| !r.price.is_finite() || r.price < 0.0) {
        return Err(ShopError::CatalogLoadError {
            source_location: location.to_string(),
            message: format!("product {} has invalid price {}", bad.id, bad.price),
        });
    }

    Ok(records.into_iter().map(Product::from).collect())
}

pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Picks the http or file source from the shape of `location`.
pub fn catalog_source_for(
    location: &str,
    timeout_seconds: Option<u64>,
) -> Result<Box<dyn CatalogSource>> {
    if is_remote(location) {
        let source = match timeout_seconds {
            Some(seconds) => HttpCatalog::with_timeout(location.to_string(), seconds)?,
            None => HttpCatalog::new(location.to_string()),
        };
        Ok(Box::new(source))
    } else {
        Ok(Box::new(FileCatalog::new(location.to_string())))
    }
}
