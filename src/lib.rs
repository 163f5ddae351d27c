pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliCommand, CliConfig};

pub use adapters::{catalog_source_for, LocalStorage, MemoryStorage};
pub use app::{Command, Presenter};
pub use config::ShopSettings;
pub use crate::core::{catalog::Catalog, ledger::CartLedger, persistence::CartPersistence, shop::Shop};
pub use utils::error::{Result, ShopError};
