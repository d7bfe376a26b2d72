//! CSV persistence for the two stores and the credential table.
//!
//! Loading is deliberately forgiving: headers are matched after trimming,
//! lowercasing and BOM-stripping, extra columns are ignored, and numeric
//! text is coerced with a zero fallback so a hand-edited file never takes
//! the whole system down. Only the credentials file is allowed to be fatal.
//! Saving rewrites both files wholesale in the fixed column schemas.

use std::{collections::HashMap, fs::File, path::Path};

use csv::ReaderBuilder;
use engine::{Catalog, Ledger, MoneyCents, Product, Transaction};

use crate::{
    auth::{Credential, Credentials},
    error::{AppError, Result},
};

const PRODUCT_FIELDS: &[&str] = &["id", "name", "price", "stock"];
const TRANSACTION_FIELDS: &[&str] = &["date", "time", "id", "quantity", "payment"];
const CREDENTIAL_FIELDS: &[&str] = &["username", "password", "type"];

/// Loads the product catalog. Missing or unreadable file → empty catalog.
pub fn load_catalog(path: &Path) -> Catalog {
    let rows = match read_rows(path, PRODUCT_FIELDS) {
        Ok(rows) => rows,
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "inventory file unavailable, starting with empty catalog");
            return Catalog::new();
        }
    };

    let products = rows
        .into_iter()
        .map(|row| Product {
            id: field(&row, "id"),
            name: field(&row, "name"),
            price: coerce_price(&field(&row, "price")),
            stock: coerce_stock(&field(&row, "stock")),
        })
        .collect();

    let catalog = Catalog::from_products(products);
    tracing::info!(path = %path.display(), products = catalog.len(), "catalog loaded");
    catalog
}

/// Loads the sales history. Missing or unreadable file → empty ledger;
/// rows whose quantity or payment fail to parse are skipped one by one.
pub fn load_ledger(path: &Path) -> Ledger {
    let rows = match read_rows(path, TRANSACTION_FIELDS) {
        Ok(rows) => rows,
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "transactions file unavailable, starting with no transactions");
            return Ledger::new();
        }
    };

    let mut transactions = Vec::new();
    for row in rows {
        let quantity_text = field(&row, "quantity");
        let Ok(quantity) = quantity_text.parse::<u32>() else {
            tracing::warn!(quantity = %quantity_text, "skipping transaction with non-numeric quantity");
            continue;
        };
        let payment_text = field(&row, "payment");
        let payment = match payment_text.parse::<MoneyCents>() {
            Ok(payment) if !payment.is_negative() => payment,
            _ => {
                tracing::warn!(payment = %payment_text, "skipping transaction with bad payment");
                continue;
            }
        };

        transactions.push(Transaction {
            date: field(&row, "date"),
            time: field(&row, "time"),
            product_id: field(&row, "id"),
            quantity,
            payment,
        });
    }

    let ledger = Ledger::from_transactions(transactions);
    tracing::info!(path = %path.display(), transactions = ledger.len(), "sales history loaded");
    ledger
}

/// Loads the credential table. Unlike the two stores, a missing or
/// unreadable credentials file is fatal to the whole process.
pub fn load_credentials(path: &Path) -> Result<Credentials> {
    let rows = read_rows(path, CREDENTIAL_FIELDS).map_err(|err| {
        AppError::Credentials(format!(
            "credentials file '{}' is unusable: {err}",
            path.display()
        ))
    })?;

    let mut credentials = HashMap::new();
    for row in rows {
        let username = field(&row, "username");
        if username.is_empty() {
            continue;
        }
        credentials.insert(
            username,
            Credential {
                password: field(&row, "password"),
                role: field(&row, "type"),
            },
        );
    }

    Ok(credentials)
}

/// Writes the catalog back in the fixed `id,name,price,stock` schema.
pub fn save_catalog(path: &Path, catalog: &Catalog) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    if catalog.is_empty() {
        // serialize() only emits the header row alongside a record.
        writer.write_record(PRODUCT_FIELDS)?;
    }
    for product in catalog.products() {
        writer.serialize(product)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the history back in the fixed `date,time,id,quantity,payment`
/// schema.
pub fn save_ledger(path: &Path, ledger: &Ledger) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    if ledger.is_empty() {
        writer.write_record(TRANSACTION_FIELDS)?;
    }
    for transaction in ledger.transactions() {
        writer.serialize(transaction)?;
    }
    writer.flush()?;
    Ok(())
}

type Row = HashMap<String, String>;

fn read_rows(path: &Path, fields: &[&str]) -> Result<Vec<Row>> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(file);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|header| header.trim_start_matches('\u{feff}').trim().to_lowercase())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row = Row::new();
        for (index, header) in headers.iter().enumerate() {
            if fields.contains(&header.as_str())
                && let Some(value) = record.get(index)
            {
                row.insert(header.clone(), value.trim().to_string());
            }
        }
        if !row.is_empty() {
            rows.push(row);
        }
    }

    Ok(rows)
}

fn field(row: &Row, name: &str) -> String {
    row.get(name).cloned().unwrap_or_default()
}

fn coerce_price(text: &str) -> MoneyCents {
    match text.parse::<MoneyCents>() {
        Ok(price) if !price.is_negative() => price,
        _ => {
            if !text.is_empty() {
                tracing::warn!(price = %text, "unusable price text, falling back to 0.00");
            }
            MoneyCents::ZERO
        }
    }
}

fn coerce_stock(text: &str) -> u32 {
    if let Ok(stock) = text.parse::<u32>() {
        return stock;
    }
    // Legacy files occasionally carry stock as decimal text ("12.0").
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value as u32,
        _ => {
            if !text.is_empty() {
                tracing::warn!(stock = %text, "unusable stock text, falling back to 0");
            }
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn loads_catalog_with_messy_headers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("inventory.csv");
        fs::write(
            &path,
            "\u{feff}ID , Name ,PRICE,stock,extra\n1,Espresso Beans,9.5,40,ignored\nP7,Paper Filters,3.20,bad,x\n",
        )
        .unwrap();

        let catalog = load_catalog(&path);
        assert_eq!(catalog.len(), 2);

        let beans = catalog.find_by_id("1").unwrap();
        assert_eq!(beans.name, "Espresso Beans");
        assert_eq!(beans.price, MoneyCents::new(9_50));
        assert_eq!(beans.stock, 40);

        let filters = catalog.find_by_id("P7").unwrap();
        assert_eq!(filters.stock, 0);
    }

    #[test]
    fn missing_inventory_file_is_not_fatal() {
        let dir = tempdir().unwrap();
        let catalog = load_catalog(&dir.path().join("nope.csv"));
        assert!(catalog.is_empty());
    }

    #[test]
    fn catalog_price_text_round_trips_as_two_decimals() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("inventory.csv");
        fs::write(&path, "id,name,price,stock\n1,Espresso Beans,9.5,40\n").unwrap();

        let catalog = load_catalog(&path);
        let out = dir.path().join("out.csv");
        save_catalog(&out, &catalog).unwrap();

        let written = fs::read_to_string(&out).unwrap();
        assert_eq!(written, "id,name,price,stock\n1,Espresso Beans,9.50,40\n");
    }

    #[test]
    fn ledger_skips_rows_with_bad_numerics() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("transactions.csv");
        fs::write(
            &path,
            "date,time,id,quantity,payment\n\
             01/03/2024,10:00:00,1,2,19.00\n\
             02/03/2024,10:00:00,1,two,19.00\n\
             03/03/2024,10:00:00,1,1,lots\n",
        )
        .unwrap();

        let ledger = load_ledger(&path);
        assert_eq!(ledger.len(), 1);
        let only = ledger.transactions().next().unwrap();
        assert_eq!(only.date, "01/03/2024");
        assert_eq!(only.quantity, 2);
    }

    #[test]
    fn ledger_round_trips_including_malformed_dates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("transactions.csv");
        fs::write(
            &path,
            "date,time,id,quantity,payment\nnot-a-date,10:00:00,gone,1,5.00\n",
        )
        .unwrap();

        let ledger = load_ledger(&path);
        let out = dir.path().join("out.csv");
        save_ledger(&out, &ledger).unwrap();

        let written = fs::read_to_string(&out).unwrap();
        assert_eq!(
            written,
            "date,time,id,quantity,payment\nnot-a-date,10:00:00,gone,1,5.00\n"
        );
    }

    #[test]
    fn missing_credentials_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(load_credentials(&dir.path().join("users.csv")).is_err());
    }

    #[test]
    fn credentials_load_by_username() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.csv");
        fs::write(
            &path,
            "username,password,type\nada,secret,manager\n,orphan,assistant\n",
        )
        .unwrap();

        let credentials = load_credentials(&path).unwrap();
        assert_eq!(credentials.len(), 1);
        assert_eq!(credentials["ada"].password, "secret");
        assert_eq!(credentials["ada"].role, "manager");
    }
}
