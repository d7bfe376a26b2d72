//! Pure queries over the ledger, optionally joined against the catalog.
//!
//! Nothing in this module mutates state. Outputs (transaction lists, ordered
//! month buckets, sorted product totals) are handed to the display layer
//! as-is; the engine never formats currency or draws anything.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;

use crate::{
    Catalog, EngineError, Ledger, MoneyCents, ResultEngine, Transaction,
    dates::{self, MonthKey},
};

/// Transactions recorded on exactly the queried calendar date.
///
/// The query is parsed under the fixed pattern (so a malformed query is an
/// [`EngineError::InvalidDate`]), then normalized back to the canonical
/// spelling and compared as text against the stored date fields. A stored
/// row with a non-canonical spelling does not match; that is the historical
/// behavior of the file contract.
pub fn by_date<'a>(ledger: &'a Ledger, date_text: &str) -> ResultEngine<Vec<&'a Transaction>> {
    let wanted = dates::format_date(dates::parse_date(date_text)?);

    Ok(ledger
        .transactions()
        .filter(|transaction| transaction.date == wanted)
        .collect())
}

/// Transactions whose product matches a name query by substring.
///
/// The query is resolved to a set of product ids first; if no product
/// matches, the result is [`EngineError::NotFound`], a distinct signal from
/// "products matched but nothing was ever sold", which is an empty list.
pub fn by_product_name<'a>(
    ledger: &'a Ledger,
    catalog: &Catalog,
    name_query: &str,
) -> ResultEngine<Vec<&'a Transaction>> {
    let ids = matching_ids(catalog, name_query)?;

    Ok(ledger
        .transactions()
        .filter(|transaction| ids.contains(transaction.product_id.as_str()))
        .collect())
}

/// Transactions for an optional name query within an inclusive date range.
///
/// A `None` or blank query means "all products": the id-set filter is
/// skipped entirely, not treated as zero matches. Rows whose own date field
/// fails to parse are skipped one by one with a warning; they never abort
/// the query.
pub fn by_product_and_date_range<'a>(
    ledger: &'a Ledger,
    catalog: &Catalog,
    name_query: Option<&str>,
    start: NaiveDate,
    end: NaiveDate,
) -> ResultEngine<Vec<&'a Transaction>> {
    check_range(start, end)?;

    let ids = match name_query.map(str::trim) {
        Some(query) if !query.is_empty() => Some(matching_ids(catalog, query)?),
        _ => None,
    };

    let mut matches = Vec::new();
    for transaction in ledger.transactions() {
        if let Some(ids) = &ids
            && !ids.contains(transaction.product_id.as_str())
        {
            continue;
        }
        match dates::parse_date(&transaction.date) {
            Ok(date) if start <= date && date <= end => matches.push(transaction),
            Ok(_) => {}
            Err(_) => {
                tracing::warn!(
                    date = %transaction.date,
                    product = %transaction.product_id,
                    "skipping transaction with malformed date"
                );
            }
        }
    }

    Ok(matches)
}

/// One month's accumulated sales.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MonthlyBucket {
    pub sales_value: MoneyCents,
    /// Number of sales, or total quantity sold, depending on the
    /// aggregation mode.
    pub tally: u64,
}

/// Buckets transactions by calendar month over an inclusive month range.
///
/// The range bounds are compared as `(year, month)` pairs via [`MonthKey`]'s
/// ordering, never as calendar days. `payment` always accumulates into
/// `sales_value`; the `tally` field accumulates either 1 per transaction or
/// the transaction's quantity depending on `by_quantity`. Rows with
/// unparseable dates are silently skipped. With `product_id` set, only that
/// product's transactions are counted (the per-product analytics view);
/// `None` aggregates the whole ledger.
///
/// The returned map iterates its keys in chronological order.
#[must_use]
pub fn monthly_aggregate(
    ledger: &Ledger,
    product_id: Option<&str>,
    start: MonthKey,
    end: MonthKey,
    by_quantity: bool,
) -> BTreeMap<MonthKey, MonthlyBucket> {
    let mut buckets: BTreeMap<MonthKey, MonthlyBucket> = BTreeMap::new();

    for transaction in ledger.transactions() {
        if let Some(id) = product_id
            && transaction.product_id != id
        {
            continue;
        }
        let Ok(date) = dates::parse_date(&transaction.date) else {
            continue;
        };

        let key = MonthKey::from(date);
        if key < start || key > end {
            continue;
        }

        let bucket = buckets.entry(key).or_default();
        bucket.sales_value += transaction.payment;
        bucket.tally += if by_quantity {
            u64::from(transaction.quantity)
        } else {
            1
        };
    }

    buckets
}

/// A product's summed sales over a date range, labeled for display.
#[derive(Clone, Debug, PartialEq)]
pub struct ProductTotal {
    pub name: String,
    pub total: MoneyCents,
}

/// Sums payments per product over an inclusive date range.
///
/// Ids are resolved to display names through the catalog; an id whose
/// product no longer exists gets an `Unknown Product (ID: …)` label rather
/// than an error. Entries come back sorted by total descending; ties keep
/// first-seen ledger order.
pub fn per_product_totals(
    ledger: &Ledger,
    catalog: &Catalog,
    start: NaiveDate,
    end: NaiveDate,
) -> ResultEngine<Vec<ProductTotal>> {
    check_range(start, end)?;

    let mut totals: Vec<(String, MoneyCents)> = Vec::new();
    for transaction in ledger.transactions() {
        let Ok(date) = dates::parse_date(&transaction.date) else {
            continue;
        };
        if date < start || date > end {
            continue;
        }

        match totals
            .iter_mut()
            .find(|(id, _)| *id == transaction.product_id)
        {
            Some((_, total)) => *total += transaction.payment,
            None => totals.push((transaction.product_id.clone(), transaction.payment)),
        }
    }

    let mut labeled: Vec<ProductTotal> = totals
        .into_iter()
        .map(|(id, total)| ProductTotal {
            name: match catalog.find_by_id(&id) {
                Some(product) => product.name.clone(),
                None => format!("Unknown Product (ID: {id})"),
            },
            total,
        })
        .collect();
    labeled.sort_by(|a, b| b.total.cmp(&a.total));

    Ok(labeled)
}

fn matching_ids(catalog: &Catalog, name_query: &str) -> ResultEngine<HashSet<String>> {
    let matches = catalog.find_by_name(name_query);
    if matches.is_empty() {
        return Err(EngineError::NotFound(format!(
            "no product matching \"{}\"",
            name_query.trim()
        )));
    }

    Ok(matches
        .into_iter()
        .map(|product| product.id.clone())
        .collect())
}

fn check_range(start: NaiveDate, end: NaiveDate) -> ResultEngine<()> {
    if start > end {
        return Err(EngineError::InvalidRange(format!(
            "start date {} is after end date {}",
            dates::format_date(start),
            dates::format_date(end)
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Product;

    fn transaction(date: &str, product_id: &str, quantity: u32, payment_cents: i64) -> Transaction {
        Transaction {
            date: date.to_string(),
            time: "10:00:00".to_string(),
            product_id: product_id.to_string(),
            quantity,
            payment: MoneyCents::new(payment_cents),
        }
    }

    fn product(id: &str, name: &str) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            price: MoneyCents::new(5_00),
            stock: 10,
        }
    }

    fn date(text: &str) -> NaiveDate {
        dates::parse_date(text).unwrap()
    }

    #[test]
    fn by_date_matches_exactly_one_day() {
        let ledger = Ledger::from_transactions(vec![
            transaction("01/03/2024", "1", 1, 100),
            transaction("02/03/2024", "1", 1, 200),
        ]);

        let matches = by_date(&ledger, "01/03/2024").unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].payment, MoneyCents::new(100));
    }

    #[test]
    fn by_date_normalizes_the_query_spelling() {
        let ledger = Ledger::from_transactions(vec![transaction("01/03/2024", "1", 1, 100)]);
        assert_eq!(by_date(&ledger, "1/3/2024").unwrap().len(), 1);
    }

    #[test]
    fn by_date_rejects_malformed_queries() {
        let ledger = Ledger::new();
        assert!(matches!(
            by_date(&ledger, "2024-03-01"),
            Err(EngineError::InvalidDate(_))
        ));
    }

    #[test]
    fn by_product_name_filters_through_the_catalog() {
        let catalog = Catalog::from_products(vec![
            product("1", "Espresso Beans"),
            product("2", "Moka Pot"),
        ]);
        let ledger = Ledger::from_transactions(vec![
            transaction("01/03/2024", "1", 1, 100),
            transaction("01/03/2024", "2", 1, 200),
            transaction("02/03/2024", "1", 1, 100),
        ]);

        let matches = by_product_name(&ledger, &catalog, "beans").unwrap();
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|t| t.product_id == "1"));
    }

    #[test]
    fn no_product_matched_is_distinct_from_no_transactions() {
        let catalog = Catalog::from_products(vec![product("1", "Espresso Beans")]);
        let ledger = Ledger::new();

        assert!(matches!(
            by_product_name(&ledger, &catalog, "tea"),
            Err(EngineError::NotFound(_))
        ));
        assert_eq!(by_product_name(&ledger, &catalog, "beans").unwrap().len(), 0);
    }

    #[test]
    fn range_query_rejects_inverted_bounds() {
        let catalog = Catalog::new();
        let ledger = Ledger::new();

        assert!(matches!(
            by_product_and_date_range(
                &ledger,
                &catalog,
                None,
                date("02/03/2024"),
                date("01/03/2024"),
            ),
            Err(EngineError::InvalidRange(_))
        ));
    }

    #[test]
    fn blank_query_means_all_products() {
        let catalog = Catalog::from_products(vec![product("1", "Espresso Beans")]);
        let ledger = Ledger::from_transactions(vec![
            transaction("01/03/2024", "1", 1, 100),
            transaction("05/03/2024", "ghost", 1, 200),
        ]);

        let all = by_product_and_date_range(
            &ledger,
            &catalog,
            Some("  "),
            date("01/03/2024"),
            date("31/03/2024"),
        )
        .unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn range_query_skips_malformed_row_dates() {
        let catalog = Catalog::from_products(vec![product("1", "Espresso Beans")]);
        let ledger = Ledger::from_transactions(vec![
            transaction("01/03/2024", "1", 1, 100),
            transaction("not-a-date", "1", 1, 999),
        ]);

        let matches = by_product_and_date_range(
            &ledger,
            &catalog,
            Some("beans"),
            date("01/03/2024"),
            date("31/03/2024"),
        )
        .unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].payment, MoneyCents::new(100));
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let catalog = Catalog::new();
        let ledger = Ledger::from_transactions(vec![
            transaction("01/03/2024", "1", 1, 100),
            transaction("05/03/2024", "1", 1, 200),
            transaction("06/03/2024", "1", 1, 400),
        ]);

        let matches = by_product_and_date_range(
            &ledger,
            &catalog,
            None,
            date("01/03/2024"),
            date("05/03/2024"),
        )
        .unwrap();
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn monthly_aggregate_buckets_in_order() {
        let ledger = Ledger::from_transactions(vec![
            transaction("01/01/2024", "1", 1, 10_00),
            transaction("15/01/2024", "1", 1, 5_00),
            transaction("01/02/2024", "1", 1, 20_00),
        ]);

        let buckets = monthly_aggregate(
            &ledger,
            None,
            MonthKey::new(2024, 1),
            MonthKey::new(2024, 2),
            false,
        );

        let entries: Vec<_> = buckets.iter().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(*entries[0].0, MonthKey::new(2024, 1));
        assert_eq!(entries[0].1.sales_value, MoneyCents::new(15_00));
        assert_eq!(entries[0].1.tally, 2);
        assert_eq!(*entries[1].0, MonthKey::new(2024, 2));
        assert_eq!(entries[1].1.sales_value, MoneyCents::new(20_00));
        assert_eq!(entries[1].1.tally, 1);
    }

    #[test]
    fn monthly_aggregate_spans_year_boundaries() {
        let ledger = Ledger::from_transactions(vec![
            transaction("31/12/2023", "1", 1, 100),
            transaction("01/01/2024", "1", 1, 200),
            transaction("01/02/2024", "1", 1, 400),
        ]);

        let buckets = monthly_aggregate(
            &ledger,
            None,
            MonthKey::new(2023, 12),
            MonthKey::new(2024, 1),
            false,
        );
        assert_eq!(buckets.len(), 2);
        assert!(buckets.contains_key(&MonthKey::new(2023, 12)));
        assert!(buckets.contains_key(&MonthKey::new(2024, 1)));
    }

    #[test]
    fn monthly_aggregate_counts_quantity_in_quantity_mode() {
        let ledger = Ledger::from_transactions(vec![
            transaction("01/01/2024", "1", 3, 100),
            transaction("02/01/2024", "1", 2, 100),
            transaction("02/01/2024", "2", 9, 100),
        ]);

        let buckets = monthly_aggregate(
            &ledger,
            Some("1"),
            MonthKey::new(2024, 1),
            MonthKey::new(2024, 1),
            true,
        );
        assert_eq!(buckets[&MonthKey::new(2024, 1)].tally, 5);
        assert_eq!(
            buckets[&MonthKey::new(2024, 1)].sales_value,
            MoneyCents::new(200)
        );
    }

    #[test]
    fn monthly_aggregate_skips_bad_dates_silently() {
        let ledger = Ledger::from_transactions(vec![
            transaction("??", "1", 1, 100),
            transaction("01/01/2024", "1", 1, 200),
        ]);

        let buckets = monthly_aggregate(
            &ledger,
            None,
            MonthKey::new(2024, 1),
            MonthKey::new(2024, 1),
            false,
        );
        assert_eq!(buckets[&MonthKey::new(2024, 1)].sales_value, MoneyCents::new(200));
        assert_eq!(buckets.len(), 1);
    }

    #[test]
    fn product_totals_sort_descending_and_tolerate_unknown_ids() {
        let catalog = Catalog::from_products(vec![
            product("1", "Espresso Beans"),
            product("2", "Moka Pot"),
        ]);
        let ledger = Ledger::from_transactions(vec![
            transaction("01/03/2024", "1", 1, 10_00),
            transaction("02/03/2024", "2", 1, 35_00),
            transaction("03/03/2024", "gone", 1, 1_00),
            transaction("04/03/2024", "1", 1, 2_00),
        ]);

        let totals = per_product_totals(&ledger, &catalog, date("01/03/2024"), date("31/03/2024"))
            .unwrap();

        assert_eq!(totals.len(), 3);
        assert_eq!(totals[0].name, "Moka Pot");
        assert_eq!(totals[0].total, MoneyCents::new(35_00));
        assert_eq!(totals[1].name, "Espresso Beans");
        assert_eq!(totals[1].total, MoneyCents::new(12_00));
        assert_eq!(totals[2].name, "Unknown Product (ID: gone)");
        assert_eq!(totals[2].total, MoneyCents::new(1_00));
    }

    #[test]
    fn product_totals_reject_inverted_range() {
        let result = per_product_totals(
            &Ledger::new(),
            &Catalog::new(),
            date("02/03/2024"),
            date("01/03/2024"),
        );
        assert!(matches!(result, Err(EngineError::InvalidRange(_))));
    }
}
