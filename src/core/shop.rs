use crate::core::catalog::Catalog;
use crate::core::ledger::{CartChange, CartLedger};
use crate::core::persistence::CartPersistence;
use crate::core::pricing::{self, CartTotals, LinePricing};
use crate::domain::model::{CartLine, Notification, ProductId, QuantityDelta};
use crate::domain::ports::{CatalogSource, KeyValueStore};
use crate::utils::error::Result;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub title: String,
    pub image: String,
    pub price: f64,
    pub stock: u32,
    pub out_of_stock: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLineView {
    pub id: ProductId,
    pub title: String,
    pub image: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub line_total: f64,
    pub can_increment: bool,
}

/// Everything a presenter needs to re-render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShopSnapshot {
    pub products: Vec<ProductView>,
    pub cart: Vec<CartLineView>,
    pub totals: CartTotals,
}

/// Owns the catalog, the cart and its storage. Presenters hold a `&mut Shop`
/// and call the intent methods; each one completes before the next starts.
pub struct Shop<S: KeyValueStore> {
    catalog: Catalog,
    cart: CartLedger,
    persistence: CartPersistence<S>,
}

impl<S: KeyValueStore> Shop<S> {
    /// 載入商品目錄並還原購物車。目錄載入失敗時無法顯示任何內容。
    pub async fn open<C: CatalogSource + ?Sized>(
        source: &C,
        persistence: CartPersistence<S>,
    ) -> Result<(Self, Vec<Notification>)> {
        let catalog = Catalog::load(source).await?;
        Ok(Self::restore(catalog, persistence))
    }

    /// Rebuilds the cart from storage against a freshly loaded catalog.
    /// Stored lines the catalog cannot back are dropped and reported.
    pub fn restore(
        mut catalog: Catalog,
        persistence: CartPersistence<S>,
    ) -> (Self, Vec<Notification>) {
        let stored = persistence.load();
        let mut cart = CartLedger::new();
        let mut notifications = Vec::new();

        for (id, line) in stored {
            let restored = cart.restore_line(
                &mut catalog,
                CartLine {
                    product_id: id,
                    quantity: line.quantity,
                },
            );
            if let Err(e) = restored {
                let title = if line.title.is_empty() {
                    format!("product {}", id)
                } else {
                    line.title.clone()
                };
                tracing::warn!("Dropping stored cart line for {}: {}", title, e);
                notifications.push(Notification::warning(format!(
                    "{} was removed from your cart because it is no longer available in that quantity",
                    title
                )));
            }
        }

        let shop = Self {
            catalog,
            cart,
            persistence,
        };

        if !notifications.is_empty() {
            shop.persist();
        }

        (shop, notifications)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cart(&self) -> &CartLedger {
        &self.cart
    }

    pub fn add_to_cart(&mut self, id: ProductId) -> Notification {
        let result = self.cart.add(&mut self.catalog, id);
        self.finish(result)
    }

    pub fn change_quantity(&mut self, id: ProductId, delta: QuantityDelta) -> Notification {
        let result = self.cart.change_quantity(&mut self.catalog, id, delta);
        self.finish(result)
    }

    pub fn remove_from_cart(&mut self, id: ProductId) -> Notification {
        let result = self.cart.remove(&mut self.catalog, id);
        self.finish(result)
    }

    /// Persists successful changes and turns either outcome into a message.
    fn finish(&self, result: Result<CartChange>) -> Notification {
        match result {
            Ok(change) => {
                let persisted = self.persist();
                let message = self.describe(change);
                if persisted {
                    Notification::info(message)
                } else {
                    Notification::warning(format!("{} (cart could not be saved)", message))
                }
            }
            Err(e) => {
                tracing::warn!("Cart action rejected: {}", e);
                Notification::warning(e.user_friendly_message())
            }
        }
    }

    fn persist(&self) -> bool {
        match self.persistence.save(&self.cart, &self.catalog) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to save cart: {}", e);
                false
            }
        }
    }

    fn title_of(&self, id: ProductId) -> String {
        self.catalog
            .get(id)
            .map(|p| p.title.clone())
            .unwrap_or_else(|| format!("product {}", id))
    }

    fn describe(&self, change: CartChange) -> String {
        let title = self.title_of(change.product_id());
        match change {
            CartChange::Added { .. } => format!("{} added to cart!", title),
            CartChange::Updated { quantity, .. } => {
                format!("{} quantity updated to {}", title, quantity)
            }
            CartChange::Removed { .. } => format!("{} removed from cart", title),
        }
    }

    pub fn verify(&self) -> Result<()> {
        self.cart.verify_against(&self.catalog)
    }

    pub fn pricing(&self) -> Vec<LinePricing> {
        pricing::price_cart(&self.cart, &self.catalog)
    }

    pub fn snapshot(&self) -> ShopSnapshot {
        let products = self
            .catalog
            .products()
            .iter()
            .map(|p| ProductView {
                id: p.id,
                title: p.title.clone(),
                image: p.image.clone(),
                price: p.price,
                stock: p.stock,
                out_of_stock: p.is_out_of_stock(),
            })
            .collect();

        let lines = self.pricing();
        let cart = lines
            .iter()
            .filter_map(|priced| {
                let product = self.catalog.get(priced.product_id)?;
                Some(CartLineView {
                    id: priced.product_id,
                    title: product.title.clone(),
                    image: product.image.clone(),
                    quantity: priced.quantity,
                    unit_price: priced.unit_price,
                    line_total: priced.total,
                    can_increment: product.stock > 0,
                })
            })
            .collect();

        ShopSnapshot {
            products,
            cart,
            totals: CartTotals::from_lines(&lines),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryStorage;
    use crate::domain::model::{NotificationLevel, Product};
    use crate::utils::error::ShopError;

    const P: ProductId = ProductId(1);

    /// Store whose writes always fail, like a full or read-only disk.
    struct ReadOnlyStorage;

    impl KeyValueStore for ReadOnlyStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn set_item(&self, key: &str, _value: &str) -> Result<()> {
            Err(ShopError::PersistenceError {
                message: format!("cannot write '{}'", key),
            })
        }
    }

    fn shop_with(storage: MemoryStorage, stock: u32) -> Shop<MemoryStorage> {
        let catalog = Catalog::from_products(vec![
            Product::new(P, "Backpack", 100.0, stock),
            Product::new(ProductId(2), "T-Shirt", 20.0, 0),
        ])
        .unwrap();
        let (shop, notifications) = Shop::restore(catalog, CartPersistence::new(storage));
        assert!(notifications.is_empty());
        shop
    }

    #[test]
    fn test_add_notifies_and_persists() {
        let storage = MemoryStorage::new();
        let mut shop = shop_with(storage.clone(), 3);

        let notification = shop.add_to_cart(P);

        assert_eq!(notification.level, NotificationLevel::Info);
        assert_eq!(notification.message, "Backpack added to cart!");
        assert!(storage.get_item("cart").unwrap().unwrap().contains("Backpack"));
    }

    #[test]
    fn test_rejection_is_a_warning_without_save() {
        let storage = MemoryStorage::new();
        let mut shop = shop_with(storage.clone(), 3);

        let notification = shop.add_to_cart(ProductId(2));

        assert!(notification.is_warning());
        assert!(notification.message.contains("Stock limit reached for T-Shirt"));
        assert!(storage.get_item("cart").unwrap().is_none());
    }

    #[test]
    fn test_remove_persists() {
        let storage = MemoryStorage::new();
        let mut shop = shop_with(storage.clone(), 3);
        shop.add_to_cart(P);

        let notification = shop.remove_from_cart(P);

        assert_eq!(notification.message, "Backpack removed from cart");
        assert_eq!(storage.get_item("cart").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_snapshot_reflects_stock_and_pricing() {
        let mut shop = shop_with(MemoryStorage::new(), 3);
        for _ in 0..3 {
            shop.add_to_cart(P);
        }

        let snapshot = shop.snapshot();

        let backpack = &snapshot.products[0];
        assert_eq!(backpack.stock, 0);
        assert!(backpack.out_of_stock);
        let line = &snapshot.cart[0];
        assert_eq!(line.quantity, 3);
        assert!((line.unit_price - 95.0).abs() < 1e-9);
        assert!((line.line_total - 285.0).abs() < 1e-9);
        assert!(!line.can_increment);
        assert_eq!(snapshot.totals.line_count, 1);
        assert_eq!(snapshot.totals.unit_count, 3);
    }

    #[test]
    fn test_restore_reapplies_stored_quantities() {
        let storage = MemoryStorage::new();
        {
            let mut shop = shop_with(storage.clone(), 5);
            shop.add_to_cart(P);
            shop.add_to_cart(P);
        }

        let shop = shop_with(storage, 5);

        assert_eq!(shop.cart().quantity_of(P), 2);
        assert_eq!(shop.catalog().get(P).unwrap().stock, 3);
        assert!(shop.verify().is_ok());
    }

    #[test]
    fn test_restore_drops_lines_the_catalog_cannot_cover() {
        let storage = MemoryStorage::new();
        storage
            .set_item(
                "cart",
                r#"{"1":{"id":1,"title":"Backpack","quantity":9},
                    "7":{"id":7,"title":"Gone","quantity":1}}"#,
            )
            .unwrap();
        let catalog =
            Catalog::from_products(vec![Product::new(P, "Backpack", 100.0, 3)]).unwrap();

        let (shop, notifications) =
            Shop::restore(catalog, CartPersistence::new(storage.clone()));

        assert!(shop.cart().is_empty());
        assert_eq!(shop.catalog().get(P).unwrap().stock, 3);
        assert_eq!(notifications.len(), 2);
        assert!(notifications.iter().all(Notification::is_warning));
        assert_eq!(storage.get_item("cart").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_save_failure_keeps_change_and_warns() {
        let catalog =
            Catalog::from_products(vec![Product::new(P, "Backpack", 100.0, 3)]).unwrap();
        let (mut shop, _) = Shop::restore(catalog, CartPersistence::new(ReadOnlyStorage));

        let notification = shop.add_to_cart(P);

        assert!(notification.is_warning());
        assert_eq!(
            notification.message,
            "Backpack added to cart! (cart could not be saved)"
        );
        assert_eq!(shop.cart().quantity_of(P), 1);
        assert_eq!(shop.catalog().get(P).unwrap().stock, 2);
        assert!(shop.verify().is_ok());
    }
}
