//! Fixed-width table rendering for the catalog and sales records.
//!
//! The engine hands over numeric values and plain labels; the `$` prefix
//! and column layout exist only here.

use engine::{Catalog, Transaction};

const RULE_WIDTH: usize = 60;

pub fn render_catalog(catalog: &Catalog) {
    println!("\n=== Product Catalog ===");
    if catalog.is_empty() {
        println!("Catalog is empty - no items available.");
        return;
    }

    println!(
        "{:<6} {:<25} {:<8} {:<10}",
        "ID", "NAME", "STOCK", "PRICE"
    );
    println!("{}", "=".repeat(RULE_WIDTH));
    for product in catalog.products() {
        // to_string() so the width specifier applies to the padded text.
        println!(
            "{:<6} {:<25} {:<8} ${:<9}",
            product.id,
            product.name,
            product.stock,
            product.price.to_string()
        );
    }
    println!("{}", "=".repeat(RULE_WIDTH));
}

pub fn render_transactions(transactions: &[&Transaction], title: &str) {
    let title = if title.is_empty() { "Sales Records" } else { title };
    println!("\n=== {title} ===");
    if transactions.is_empty() {
        println!("No matching records found.");
        return;
    }

    println!(
        "{:<12} {:<10} {:<9} {:<10} {:<10}",
        "DATE", "TIME", "PROD_ID", "QUANTITY", "AMOUNT"
    );
    println!("{}", "=".repeat(RULE_WIDTH));
    for transaction in transactions {
        println!(
            "{:<12} {:<10} {:<9} {:<10} ${:<9}",
            transaction.date,
            transaction.time,
            transaction.product_id,
            transaction.quantity,
            transaction.payment.to_string()
        );
    }
    println!("{}", "=".repeat(RULE_WIDTH));
}
