use crate::domain::model::{Product, ProductId};
use crate::domain::ports::CatalogSource;
use crate::utils::error::{Result, ShopError};
use std::collections::HashMap;

/// Products loaded once at startup. Stock counters are the only mutable
/// state and are changed exclusively through the cart ledger.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
}

impl Catalog {
    pub fn from_products(products: Vec<Product>) -> Result<Self> {
        let mut index = HashMap::with_capacity(products.len());
        for (position, product) in products.iter().enumerate() {
            if index.insert(product.id, position).is_some() {
                return Err(ShopError::CatalogLoadError {
                    source_location: "catalog".to_string(),
                    message: format!("duplicate product id {}", product.id),
                });
            }
        }
        Ok(Self { products, index })
    }

    /// 從來源載入商品清單（只在啟動時執行一次）
    pub async fn load<C: CatalogSource + ?Sized>(source: &C) -> Result<Self> {
        tracing::info!("Loading catalog from: {}", source.location());

        let products = source.fetch_products().await.map_err(|e| match e {
            ShopError::CatalogLoadError { .. } => e,
            other => ShopError::CatalogLoadError {
                source_location: source.location().to_string(),
                message: other.to_string(),
            },
        })?;

        let catalog = Self::from_products(products).map_err(|e| match e {
            ShopError::CatalogLoadError { message, .. } => ShopError::CatalogLoadError {
                source_location: source.location().to_string(),
                message,
            },
            other => other,
        })?;

        tracing::info!("Loaded {} products", catalog.len());
        Ok(catalog)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.index.get(&id).map(|&position| &self.products[position])
    }

    pub fn require(&self, id: ProductId) -> Result<&Product> {
        self.get(id)
            .ok_or(ShopError::UnknownProduct { product_id: id })
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    fn require_mut(&mut self, id: ProductId) -> Result<&mut Product> {
        match self.index.get(&id) {
            Some(&position) => Ok(&mut self.products[position]),
            None => Err(ShopError::UnknownProduct { product_id: id }),
        }
    }

    /// Moves `units` out of stock. Fails without touching the counter when
    /// fewer than `units` remain.
    pub(crate) fn take_stock(&mut self, id: ProductId, units: u32) -> Result<()> {
        let product = self.require_mut(id)?;
        if product.stock < units {
            return Err(ShopError::StockExceeded {
                product_id: id,
                title: product.title.clone(),
            });
        }
        product.stock -= units;
        Ok(())
    }

    /// Puts `units` back. Stock may never climb above the loaded level.
    pub(crate) fn return_stock(&mut self, id: ProductId, units: u32) -> Result<()> {
        let product = self.require_mut(id)?;
        let restored = product.stock.saturating_add(units);
        if restored > product.initial_stock {
            return Err(ShopError::StockDrift {
                product_id: id,
                expected: product.initial_stock,
                actual: restored,
            });
        }
        product.stock = restored;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::from_products(vec![
            Product::new(ProductId(1), "Backpack", 109.95, 2),
            Product::new(ProductId(2), "T-Shirt", 22.3, 0),
        ])
        .unwrap()
    }

    #[test]
    fn test_lookup_by_id() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(ProductId(2)).unwrap().title, "T-Shirt");
        assert!(catalog.get(ProductId(3)).is_none());
        assert!(matches!(
            catalog.require(ProductId(3)),
            Err(ShopError::UnknownProduct { .. })
        ));
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let result = Catalog::from_products(vec![
            Product::new(ProductId(1), "A", 1.0, 1),
            Product::new(ProductId(1), "B", 2.0, 1),
        ]);
        assert!(matches!(result, Err(ShopError::CatalogLoadError { .. })));
    }

    #[test]
    fn test_take_stock_never_goes_negative() {
        let mut catalog = catalog();
        assert!(catalog.take_stock(ProductId(1), 2).is_ok());
        assert_eq!(catalog.get(ProductId(1)).unwrap().stock, 0);

        let err = catalog.take_stock(ProductId(1), 1).unwrap_err();
        assert!(matches!(err, ShopError::StockExceeded { .. }));
        assert_eq!(catalog.get(ProductId(1)).unwrap().stock, 0);
    }

    #[test]
    fn test_return_stock_is_capped_at_initial_level() {
        let mut catalog = catalog();
        catalog.take_stock(ProductId(1), 1).unwrap();
        assert!(catalog.return_stock(ProductId(1), 1).is_ok());

        let err = catalog.return_stock(ProductId(1), 1).unwrap_err();
        assert!(matches!(err, ShopError::StockDrift { .. }));
        assert_eq!(catalog.get(ProductId(1)).unwrap().stock, 2);
    }
}
