//! Plain-text rendering of shop snapshots for the terminal.

use crate::core::pricing::format_amount;
use crate::core::shop::ShopSnapshot;

pub fn render_products(snapshot: &ShopSnapshot, currency: &str) -> String {
    if snapshot.products.is_empty() {
        return "No products available.\n".to_string();
    }

    let title_width = snapshot
        .products
        .iter()
        .map(|p| p.title.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for product in &snapshot.products {
        let availability = if product.out_of_stock {
            "Out of Stock".to_string()
        } else {
            format!("Stock: {}", product.stock)
        };
        out.push_str(&format!(
            "#{:<4} {:<width$}  {}{:>10}  {}\n",
            product.id,
            product.title,
            currency,
            format_amount(product.price),
            availability,
            width = title_width
        ));
    }
    out
}

pub fn render_cart(snapshot: &ShopSnapshot, currency: &str) -> String {
    let mut out = String::new();

    if snapshot.cart.is_empty() {
        out.push_str("Your cart is empty.\n");
    }

    for line in &snapshot.cart {
        let increment = if line.can_increment { "+" } else { " " };
        out.push_str(&format!(
            "#{:<4} {} (x{})  {}{}  [-] [{}]\n",
            line.id,
            line.title,
            line.quantity,
            currency,
            format_amount(line.line_total),
            increment
        ));
    }

    let totals = &snapshot.totals;
    out.push_str(&format!("Items: {}\n", totals.line_count));
    if totals.savings > 0.0 {
        out.push_str(&format!("You save: {}{}\n", currency, format_amount(totals.savings)));
    }
    out.push_str(&format!("Total: {}{}\n", currency, format_amount(totals.total)));
    out
}
