//! `bottega`: single-session terminal point-of-sale and inventory tracker.

use std::path::Path;

mod auth;
mod charts;
mod error;
mod menu;
mod settings;
mod storage;
mod views;

use crate::error::Result;

fn main() -> Result<()> {
    let settings = settings::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "bottega={level},engine={level}",
            level = settings.level
        ))
        .init();

    let transactions_path = Path::new(&settings.transactions_file);
    let inventory_path = Path::new(&settings.inventory_file);

    // Credentials first: without authentication data the system cannot
    // start, while missing store files just mean an empty session.
    let credentials = match storage::load_credentials(Path::new(&settings.credentials_file)) {
        Ok(credentials) => credentials,
        Err(err) => {
            eprintln!("CRITICAL: {err}. System cannot start without authentication data.");
            return Err(err);
        }
    };
    let mut catalog = storage::load_catalog(inventory_path);
    let mut ledger = storage::load_ledger(transactions_path);

    let Some((username, role)) = menu::login(&credentials)? else {
        return Ok(());
    };

    menu::run_dashboard(role, &mut catalog, &mut ledger)?;

    println!("\n>>> Goodbye, {username}! <<<");

    // A failed save is reported but never blocks the normal exit.
    match storage::save_ledger(transactions_path, &ledger) {
        Ok(()) => println!("Transaction history written to '{}'.", settings.transactions_file),
        Err(err) => {
            tracing::error!(%err, "transaction file save failed");
            println!("Transaction file save failed: {err}");
        }
    }
    match storage::save_catalog(inventory_path, &catalog) {
        Ok(()) => println!("Inventory database written to '{}'.", settings.inventory_file),
        Err(err) => {
            tracing::error!(%err, "inventory file save failed");
            println!("Inventory file save failed: {err}");
        }
    }

    Ok(())
}
