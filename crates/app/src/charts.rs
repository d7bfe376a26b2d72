//! Plain-terminal charts for the analytics views.
//!
//! Each series is drawn as labeled block bars so the whole program stays
//! inside one terminal session; no plotting window is ever opened.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use engine::{MonthKey, MonthlyBucket, ProductTotal};

const BAR_WIDTH: usize = 40;

/// Creates a simple ASCII-based horizontal bar.
///
/// Returns a string like `████████░░░░░░░░░░░░` representing the ratio.
#[must_use]
pub fn ascii_bar(value: u64, max: u64, width: usize) -> String {
    if max == 0 {
        return "░".repeat(width);
    }

    let ratio = (value as f64 / max as f64).clamp(0.0, 1.0);
    let filled = ((ratio * width as f64) as usize).min(width);
    let empty = width.saturating_sub(filled);

    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

/// `Jan 2024`-style label for a month bucket.
#[must_use]
pub fn month_label(key: MonthKey) -> String {
    match NaiveDate::from_ymd_opt(key.year, key.month, 1) {
        Some(date) => date.format("%b %Y").to_string(),
        None => format!("{:02}/{}", key.month, key.year),
    }
}

/// Draws the monthly sales chart: one bar per month scaled to the largest
/// sales value, with the tally (sale count or units sold) alongside.
pub fn render_monthly(title: &str, buckets: &BTreeMap<MonthKey, MonthlyBucket>, tally_label: &str) {
    println!("\n=== {title} ===");
    if buckets.is_empty() {
        println!("No sales data found for the specified month range.");
        return;
    }

    let max_cents = buckets
        .values()
        .map(|bucket| bucket.sales_value.cents().max(0) as u64)
        .max()
        .unwrap_or(0);

    for (key, bucket) in buckets {
        println!(
            "{:<9} {} ${:<10} {} {}",
            month_label(*key),
            ascii_bar(bucket.sales_value.cents().max(0) as u64, max_cents, BAR_WIDTH),
            bucket.sales_value.to_string(),
            bucket.tally,
            tally_label
        );
    }
}

/// Draws the per-product totals bar chart, already sorted by the engine.
pub fn render_product_totals(title: &str, totals: &[ProductTotal]) {
    println!("\n=== {title} ===");
    if totals.is_empty() {
        println!("No sales data found for the specified date range.");
        return;
    }

    let max_cents = totals
        .iter()
        .map(|entry| entry.total.cents().max(0) as u64)
        .max()
        .unwrap_or(0);

    for entry in totals {
        println!(
            "{:<28} {} ${}",
            entry.name,
            ascii_bar(entry.total.cents().max(0) as u64, max_cents, BAR_WIDTH),
            entry.total
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_scales_to_max() {
        assert_eq!(ascii_bar(10, 10, 4), "████");
        assert_eq!(ascii_bar(5, 10, 4), "██░░");
        assert_eq!(ascii_bar(0, 10, 4), "░░░░");
    }

    #[test]
    fn zero_max_draws_an_empty_bar() {
        assert_eq!(ascii_bar(3, 0, 4), "░░░░");
    }

    #[test]
    fn month_labels_use_abbreviations() {
        assert_eq!(month_label(MonthKey::new(2024, 1)), "Jan 2024");
        assert_eq!(month_label(MonthKey::new(2023, 12)), "Dec 2023");
    }
}
