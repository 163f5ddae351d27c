//! Tiered quantity discounts and cart totals.
//!
//! All arithmetic keeps full `f64` precision; only [`round_for_display`] and
//! [`format_amount`] round to cents.

use crate::core::catalog::Catalog;
use crate::core::ledger::CartLedger;
use crate::domain::model::ProductId;
use serde::Serialize;

/// A quantity threshold mapping to a unit-price multiplier. Applies when the
/// line quantity is strictly greater than `above_quantity`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscountTier {
    pub above_quantity: u32,
    pub multiplier: f64,
}

/// Highest threshold first.
pub const DISCOUNT_TIERS: [DiscountTier; 2] = [
    DiscountTier {
        above_quantity: 5,
        multiplier: 0.90,
    },
    DiscountTier {
        above_quantity: 2,
        multiplier: 0.95,
    },
];

pub fn tier_for(quantity: u32) -> Option<&'static DiscountTier> {
    DISCOUNT_TIERS
        .iter()
        .find(|tier| quantity > tier.above_quantity)
}

pub fn discounted_unit_price(quantity: u32, base_price: f64) -> f64 {
    match tier_for(quantity) {
        Some(tier) => base_price * tier.multiplier,
        None => base_price,
    }
}

pub fn line_total(quantity: u32, base_price: f64) -> f64 {
    discounted_unit_price(quantity, base_price) * f64::from(quantity)
}

pub fn round_for_display(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", round_for_display(amount))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinePricing {
    pub product_id: ProductId,
    pub quantity: u32,
    pub base_price: f64,
    pub unit_price: f64,
    pub subtotal: f64,
    pub total: f64,
}

impl LinePricing {
    pub fn new(product_id: ProductId, quantity: u32, base_price: f64) -> Self {
        Self {
            product_id,
            quantity,
            base_price,
            unit_price: discounted_unit_price(quantity, base_price),
            subtotal: base_price * f64::from(quantity),
            total: line_total(quantity, base_price),
        }
    }

    pub fn savings(&self) -> f64 {
        self.subtotal - self.total
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartTotals {
    /// Distinct lines in the cart.
    pub line_count: usize,
    pub unit_count: u32,
    /// Before discounts.
    pub subtotal: f64,
    pub total: f64,
    pub savings: f64,
}

impl CartTotals {
    pub fn from_lines(lines: &[LinePricing]) -> Self {
        let subtotal: f64 = lines.iter().map(|line| line.subtotal).sum();
        let total: f64 = lines.iter().map(|line| line.total).sum();
        Self {
            line_count: lines.len(),
            unit_count: lines.iter().map(|line| line.quantity).sum(),
            subtotal,
            total,
            savings: subtotal - total,
        }
    }
}

/// Prices every ledger line against the live catalog price.
pub fn price_cart(ledger: &CartLedger, catalog: &Catalog) -> Vec<LinePricing> {
    ledger
        .lines()
        .filter_map(|line| {
            catalog
                .get(line.product_id)
                .map(|product| LinePricing::new(line.product_id, line.quantity, product.price))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_tier_boundaries() {
        assert!(approx_eq(discounted_unit_price(1, 100.0), 100.0));
        assert!(approx_eq(discounted_unit_price(2, 100.0), 100.0));
        assert!(approx_eq(discounted_unit_price(3, 100.0), 95.0));
        assert!(approx_eq(discounted_unit_price(5, 100.0), 95.0));
        assert!(approx_eq(discounted_unit_price(6, 100.0), 90.0));
        assert!(approx_eq(discounted_unit_price(40, 100.0), 90.0));
    }

    #[test]
    fn test_line_total_keeps_precision_until_display() {
        // 3 x 0.95 x 10.99 = 31.3215
        let total = line_total(3, 10.99);
        assert!(approx_eq(total, 31.3215));
        assert_eq!(format_amount(total), "31.32");
    }

    #[test]
    fn test_cart_totals_sum_unrounded_lines() {
        let lines = vec![
            LinePricing::new(ProductId(1), 3, 10.99),
            LinePricing::new(ProductId(2), 3, 10.99),
        ];
        let totals = CartTotals::from_lines(&lines);

        assert_eq!(totals.line_count, 2);
        assert_eq!(totals.unit_count, 6);
        assert!(approx_eq(totals.total, 62.643));
        assert_eq!(format_amount(totals.total), "62.64");
        assert!(approx_eq(totals.savings, 65.94 - 62.643));
    }

    #[test]
    fn test_scenario_three_units_at_hundred() {
        let line = LinePricing::new(ProductId(1), 3, 100.0);
        assert!(approx_eq(line.unit_price, 95.0));
        assert!(approx_eq(line.total, 285.0));
        assert_eq!(format_amount(line.total), "285.00");
    }
}
