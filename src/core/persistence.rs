use crate::core::catalog::Catalog;
use crate::core::ledger::CartLedger;
use crate::domain::model::{ProductId, StoredLine};
use crate::domain::ports::KeyValueStore;
use crate::utils::error::{Result, ShopError};
use std::collections::BTreeMap;

pub const DEFAULT_CART_KEY: &str = "cart";

/// Serialized cart: an object keyed by product id.
pub type StoredCart = BTreeMap<ProductId, StoredLine>;

pub struct CartPersistence<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> CartPersistence<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_CART_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Writes every line together with the product fields shown in the cart.
    pub fn save(&self, ledger: &CartLedger, catalog: &Catalog) -> Result<()> {
        let stored: StoredCart = ledger
            .lines()
            .map(|line| {
                let snapshot = catalog.get(line.product_id);
                let stored_line = StoredLine {
                    id: line.product_id,
                    title: snapshot.map(|p| p.title.clone()).unwrap_or_default(),
                    image: snapshot.map(|p| p.image.clone()).unwrap_or_default(),
                    price: snapshot.map(|p| p.price).unwrap_or_default(),
                    quantity: line.quantity,
                };
                (line.product_id, stored_line)
            })
            .collect();

        let json = serde_json::to_string(&stored)?;
        self.store.set_item(&self.key, &json)?;
        tracing::debug!("Saved cart with {} lines under key '{}'", stored.len(), self.key);
        Ok(())
    }

    /// Strict read: `Ok(None)` when nothing is stored, `Err` when the stored
    /// value cannot be read or parsed.
    pub fn try_load(&self) -> Result<Option<StoredCart>> {
        let Some(raw) = self.store.get_item(&self.key)? else {
            return Ok(None);
        };

        let stored: StoredCart =
            serde_json::from_str(&raw).map_err(|e| ShopError::PersistenceError {
                message: format!("stored cart under '{}' is malformed: {}", self.key, e),
            })?;

        if let Some((key, line)) = stored.iter().find(|(key, line)| **key != line.id) {
            return Err(ShopError::PersistenceError {
                message: format!("stored line keyed {} carries id {}", key, line.id),
            });
        }

        Ok(Some(stored))
    }

    /// Startup read. Missing or unreadable data yields an empty cart.
    pub fn load(&self) -> StoredCart {
        match self.try_load() {
            Ok(Some(stored)) => {
                tracing::info!("Restored cart with {} lines", stored.len());
                stored
            }
            Ok(None) => {
                tracing::debug!("No stored cart under key '{}'", self.key);
                StoredCart::new()
            }
            Err(e) => {
                tracing::warn!("Ignoring stored cart, starting empty: {}", e);
                StoredCart::new()
            }
        }
    }
}
