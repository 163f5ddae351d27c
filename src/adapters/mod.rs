// Adapters layer: concrete implementations of the domain ports (catalog
// sources and cart storage).

pub mod catalog;
pub mod storage;

pub use catalog::{catalog_source_for, FileCatalog, HttpCatalog};
pub use storage::{LocalStorage, MemoryStorage};
