use crate::core::catalog::Catalog;
use crate::domain::model::{CartLine, ProductId, QuantityDelta};
use crate::utils::error::{Result, ShopError};
use std::collections::BTreeMap;

/// Outcome of a successful ledger mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    Added { product_id: ProductId, quantity: u32 },
    Updated { product_id: ProductId, quantity: u32 },
    Removed { product_id: ProductId, returned: u32 },
}

impl CartChange {
    pub fn product_id(&self) -> ProductId {
        match *self {
            CartChange::Added { product_id, .. }
            | CartChange::Updated { product_id, .. }
            | CartChange::Removed { product_id, .. } => product_id,
        }
    }
}

/// Product id -> cart line.
///
/// Every mutation moves units between a line and the catalog's stock counter,
/// so `stock + quantity` stays equal to the loaded stock for each product.
/// A rejected mutation leaves both sides untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartLedger {
    lines: BTreeMap<ProductId, CartLine>,
}

impl CartLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.values()
    }

    pub fn get(&self, id: ProductId) -> Option<&CartLine> {
        self.lines.get(&id)
    }

    pub fn quantity_of(&self, id: ProductId) -> u32 {
        self.lines.get(&id).map(|line| line.quantity).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn add(&mut self, catalog: &mut Catalog, id: ProductId) -> Result<CartChange> {
        catalog.take_stock(id, 1)?;

        let line = self.lines.entry(id).or_insert(CartLine {
            product_id: id,
            quantity: 0,
        });
        line.quantity += 1;

        tracing::debug!("Added product {} to cart, quantity now {}", id, line.quantity);
        Ok(if line.quantity == 1 {
            CartChange::Added {
                product_id: id,
                quantity: 1,
            }
        } else {
            CartChange::Updated {
                product_id: id,
                quantity: line.quantity,
            }
        })
    }

    pub fn change_quantity(
        &mut self,
        catalog: &mut Catalog,
        id: ProductId,
        delta: QuantityDelta,
    ) -> Result<CartChange> {
        let current = self
            .lines
            .get(&id)
            .map(|line| line.quantity)
            .ok_or(ShopError::NotInCart { product_id: id })?;
        let product = catalog.require(id)?;

        let candidate = i64::from(current) + delta.as_i64();
        let ceiling = i64::from(product.stock) + i64::from(current);

        if candidate <= 0 {
            return self.remove(catalog, id);
        }
        if candidate > ceiling {
            tracing::warn!(
                "Rejected quantity {} for product {} (ceiling {})",
                candidate,
                id,
                ceiling
            );
            return Err(ShopError::StockExceeded {
                product_id: id,
                title: product.title.clone(),
            });
        }

        match delta {
            QuantityDelta::Increment => catalog.take_stock(id, 1)?,
            QuantityDelta::Decrement => catalog.return_stock(id, 1)?,
        }

        let quantity = candidate as u32;
        if let Some(line) = self.lines.get_mut(&id) {
            line.quantity = quantity;
        }

        tracing::debug!("Changed quantity of product {} to {}", id, quantity);
        Ok(CartChange::Updated {
            product_id: id,
            quantity,
        })
    }

    pub fn remove(&mut self, catalog: &mut Catalog, id: ProductId) -> Result<CartChange> {
        let quantity = self
            .lines
            .get(&id)
            .map(|line| line.quantity)
            .ok_or(ShopError::NotInCart { product_id: id })?;

        catalog.return_stock(id, quantity)?;
        self.lines.remove(&id);

        tracing::debug!("Removed product {} from cart, {} units back in stock", id, quantity);
        Ok(CartChange::Removed {
            product_id: id,
            returned: quantity,
        })
    }

    /// Inserts a line restored from storage, taking its units out of stock.
    pub(crate) fn restore_line(&mut self, catalog: &mut Catalog, line: CartLine) -> Result<()> {
        if line.quantity == 0 {
            return Err(ShopError::PersistenceError {
                message: format!("stored line for product {} has zero quantity", line.product_id),
            });
        }
        if self.lines.contains_key(&line.product_id) {
            return Err(ShopError::PersistenceError {
                message: format!("product {} stored twice", line.product_id),
            });
        }
        catalog.take_stock(line.product_id, line.quantity)?;
        self.lines.insert(line.product_id, line);
        Ok(())
    }

    /// Checks `stock + quantity == initial stock` for every catalog product.
    pub fn verify_against(&self, catalog: &Catalog) -> Result<()> {
        for product in catalog.products() {
            let in_cart = self.quantity_of(product.id);
            let accounted = product.stock + in_cart;
            if accounted != product.initial_stock {
                return Err(ShopError::StockDrift {
                    product_id: product.id,
                    expected: product.initial_stock,
                    actual: accounted,
                });
            }
        }
        if let Some(orphan) = self.lines.keys().find(|id| !catalog.contains(**id)) {
            return Err(ShopError::UnknownProduct {
                product_id: *orphan,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Product;

    const P: ProductId = ProductId(1);

    fn catalog_with_stock(stock: u32) -> Catalog {
        Catalog::from_products(vec![Product::new(P, "Backpack", 100.0, stock)]).unwrap()
    }

    #[test]
    fn test_add_creates_line_and_takes_stock() {
        let mut catalog = catalog_with_stock(3);
        let mut ledger = CartLedger::new();

        let change = ledger.add(&mut catalog, P).unwrap();

        assert_eq!(change, CartChange::Added { product_id: P, quantity: 1 });
        assert_eq!(ledger.quantity_of(P), 1);
        assert_eq!(catalog.get(P).unwrap().stock, 2);
    }

    #[test]
    fn test_add_up_to_exact_stock_then_reject() {
        let mut catalog = catalog_with_stock(3);
        let mut ledger = CartLedger::new();

        for _ in 0..3 {
            ledger.add(&mut catalog, P).unwrap();
        }
        assert_eq!(ledger.quantity_of(P), 3);
        assert_eq!(catalog.get(P).unwrap().stock, 0);

        let err = ledger.add(&mut catalog, P).unwrap_err();
        assert!(matches!(err, ShopError::StockExceeded { .. }));
        assert_eq!(ledger.quantity_of(P), 3);
        assert_eq!(catalog.get(P).unwrap().stock, 0);
    }

    #[test]
    fn test_add_with_zero_stock_changes_nothing() {
        let mut catalog = catalog_with_stock(0);
        let mut ledger = CartLedger::new();

        let err = ledger.add(&mut catalog, P).unwrap_err();

        assert!(matches!(err, ShopError::StockExceeded { .. }));
        assert!(ledger.is_empty());
        assert_eq!(catalog.get(P).unwrap().stock, 0);
    }

    #[test]
    fn test_add_unknown_product() {
        let mut catalog = catalog_with_stock(3);
        let mut ledger = CartLedger::new();

        let err = ledger.add(&mut catalog, ProductId(99)).unwrap_err();
        assert!(matches!(err, ShopError::UnknownProduct { .. }));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_decrement_from_one_removes_line() {
        let mut catalog = catalog_with_stock(3);
        let mut ledger = CartLedger::new();
        ledger.add(&mut catalog, P).unwrap();

        let change = ledger
            .change_quantity(&mut catalog, P, QuantityDelta::Decrement)
            .unwrap();

        assert_eq!(change, CartChange::Removed { product_id: P, returned: 1 });
        assert!(ledger.get(P).is_none());
        assert_eq!(catalog.get(P).unwrap().stock, 3);
    }

    #[test]
    fn test_increment_respects_ceiling() {
        let mut catalog = catalog_with_stock(2);
        let mut ledger = CartLedger::new();
        ledger.add(&mut catalog, P).unwrap();

        ledger
            .change_quantity(&mut catalog, P, QuantityDelta::Increment)
            .unwrap();
        assert_eq!(ledger.quantity_of(P), 2);

        let err = ledger
            .change_quantity(&mut catalog, P, QuantityDelta::Increment)
            .unwrap_err();
        assert!(matches!(err, ShopError::StockExceeded { .. }));
        assert_eq!(ledger.quantity_of(P), 2);
        assert_eq!(catalog.get(P).unwrap().stock, 0);
    }

    #[test]
    fn test_change_quantity_requires_line() {
        let mut catalog = catalog_with_stock(2);
        let mut ledger = CartLedger::new();

        let err = ledger
            .change_quantity(&mut catalog, P, QuantityDelta::Increment)
            .unwrap_err();
        assert!(matches!(err, ShopError::NotInCart { .. }));
        assert_eq!(catalog.get(P).unwrap().stock, 2);
    }

    #[test]
    fn test_remove_returns_full_quantity() {
        let mut catalog = catalog_with_stock(5);
        let mut ledger = CartLedger::new();
        for _ in 0..4 {
            ledger.add(&mut catalog, P).unwrap();
        }

        let change = ledger.remove(&mut catalog, P).unwrap();

        assert_eq!(change, CartChange::Removed { product_id: P, returned: 4 });
        assert!(ledger.is_empty());
        assert_eq!(catalog.get(P).unwrap().stock, 5);
        assert!(ledger.verify_against(&catalog).is_ok());
    }

    #[test]
    fn test_restore_line_rejects_uncoverable_quantity() {
        let mut catalog = catalog_with_stock(2);
        let mut ledger = CartLedger::new();

        let err = ledger
            .restore_line(&mut catalog, CartLine { product_id: P, quantity: 3 })
            .unwrap_err();

        assert!(matches!(err, ShopError::StockExceeded { .. }));
        assert!(ledger.is_empty());
        assert_eq!(catalog.get(P).unwrap().stock, 2);
    }

    #[test]
    fn test_verify_detects_drift() {
        let mut catalog = catalog_with_stock(2);
        let ledger = CartLedger::new();
        catalog.take_stock(P, 1).unwrap();

        assert!(matches!(
            ledger.verify_against(&catalog),
            Err(ShopError::StockDrift { expected: 2, actual: 1, .. })
        ));
    }
}
