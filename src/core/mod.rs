pub mod catalog;
pub mod ledger;
pub mod persistence;
pub mod pricing;
pub mod shop;

pub use crate::domain::model::{CartLine, Notification, Product, ProductId, QuantityDelta};
pub use crate::domain::ports::{CatalogSource, ConfigProvider, KeyValueStore};
pub use crate::utils::error::Result;
