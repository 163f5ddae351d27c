pub mod toml_config;

use crate::core::persistence::DEFAULT_CART_KEY;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use toml_config::TomlConfig;

pub const DEFAULT_CATALOG_SOURCE: &str = "data/data.json";
pub const DEFAULT_STORAGE_PATH: &str = "./.small-cart";
pub const DEFAULT_CURRENCY: &str = "Rs.";

/// Effective settings: built-in defaults, then the TOML file, then flags.
#[derive(Debug, Clone, PartialEq)]
pub struct ShopSettings {
    pub catalog_source: String,
    pub request_timeout_seconds: Option<u64>,
    pub storage_path: String,
    pub storage_key: String,
    pub currency: String,
}

impl Default for ShopSettings {
    fn default() -> Self {
        Self {
            catalog_source: DEFAULT_CATALOG_SOURCE.to_string(),
            request_timeout_seconds: None,
            storage_path: DEFAULT_STORAGE_PATH.to_string(),
            storage_key: DEFAULT_CART_KEY.to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl ShopSettings {
    pub fn from_toml(config: &TomlConfig) -> Self {
        let defaults = Self::default();
        Self {
            catalog_source: config
                .catalog
                .source
                .clone()
                .unwrap_or(defaults.catalog_source),
            request_timeout_seconds: config.catalog.timeout_seconds,
            storage_path: config.storage.path.clone().unwrap_or(defaults.storage_path),
            storage_key: config.storage.key.clone().unwrap_or(defaults.storage_key),
            currency: config
                .currency()
                .map(str::to_string)
                .unwrap_or(defaults.currency),
        }
    }

    #[cfg(feature = "cli")]
    pub fn resolve(cli: &CliConfig) -> Result<Self> {
        let mut settings = match &cli.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                let toml_config = TomlConfig::from_file(path)?;
                toml_config.validate()?;
                Self::from_toml(&toml_config)
            }
            None => Self::default(),
        };

        if let Some(catalog) = &cli.catalog {
            settings.catalog_source = catalog.clone();
        }
        if let Some(path) = &cli.storage_path {
            settings.storage_path = path.clone();
        }
        if let Some(key) = &cli.storage_key {
            settings.storage_key = key.clone();
        }
        Ok(settings)
    }
}

impl ConfigProvider for ShopSettings {
    fn catalog_source(&self) -> &str {
        &self.catalog_source
    }

    fn storage_path(&self) -> &str {
        &self.storage_path
    }

    fn storage_key(&self) -> &str {
        &self.storage_key
    }

    fn request_timeout_seconds(&self) -> Option<u64> {
        self.request_timeout_seconds
    }

    fn currency(&self) -> &str {
        &self.currency
    }
}

impl Validate for ShopSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_catalog_location("catalog", &self.catalog_source)?;
        validation::validate_path("storage_path", &self.storage_path)?;
        validation::validate_storage_key("storage_key", &self.storage_key)?;
        if let Some(timeout) = self.request_timeout_seconds {
            validation::validate_positive_number("timeout_seconds", timeout as usize, 1)?;
        }
        Ok(())
    }
}

#[cfg(feature = "cli")]
pub use cli::{CliCommand, CliConfig};

#[cfg(feature = "cli")]
mod cli {
    use crate::domain::model::ProductId;
    use clap::{Parser, Subcommand};

    #[derive(Debug, Clone, Parser)]
    #[command(name = "small-cart")]
    #[command(about = "A small stock-aware shopping cart")]
    pub struct CliConfig {
        /// Path to a TOML configuration file
        #[arg(short, long)]
        pub config: Option<String>,

        /// Catalog source: an http(s) URL or a local JSON file
        #[arg(long)]
        pub catalog: Option<String>,

        /// Directory holding the saved cart
        #[arg(long)]
        pub storage_path: Option<String>,

        /// Storage key of the saved cart
        #[arg(long)]
        pub storage_key: Option<String>,

        /// Print snapshots as JSON instead of text
        #[arg(long)]
        pub json: bool,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[command(subcommand)]
        pub command: CliCommand,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum CliCommand {
        /// List the product catalog with remaining stock
        Products,
        /// Show the cart with discounted prices
        Cart,
        /// Add one unit of a product to the cart
        Add { id: ProductId },
        /// Increase a cart line by one
        Inc { id: ProductId },
        /// Decrease a cart line by one, removing it at zero
        Dec { id: ProductId },
        /// Remove a product from the cart
        Remove { id: ProductId },
        /// Read commands from stdin, one per line
        Shell,
    }
}
