//! Settings for the `bottega` binary.
//!
//! Layering, lowest priority first: built-in defaults, an optional TOML
//! file, `BOTTEGA_*` environment variables, CLI flags.

use clap::Parser;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "bottega.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Sales history file, rewritten wholesale at sign-out.
    pub transactions_file: String,
    /// Product catalog file, rewritten wholesale at sign-out.
    pub inventory_file: String,
    /// Credential table. Missing file is fatal: the system cannot start
    /// without authentication data.
    pub credentials_file: String,
    /// Log level for the env-filter (e.g. `info`, `debug`).
    pub level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            transactions_file: "transactions.csv".to_string(),
            inventory_file: "inventory.csv".to_string(),
            credentials_file: "users.csv".to_string(),
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "bottega", about = "Terminal point-of-sale and inventory tracker")]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the transactions file path.
    #[arg(long)]
    transactions: Option<String>,
    /// Override the inventory file path.
    #[arg(long)]
    inventory: Option<String>,
    /// Override the credentials file path.
    #[arg(long)]
    credentials: Option<String>,
    /// Override the log level.
    #[arg(long)]
    level: Option<String>,
}

pub fn load() -> Result<Settings> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("BOTTEGA"));
    let mut settings: Settings = builder.build()?.try_deserialize()?;

    if let Some(transactions) = args.transactions {
        settings.transactions_file = transactions;
    }
    if let Some(inventory) = args.inventory {
        settings.inventory_file = inventory;
    }
    if let Some(credentials) = args.credentials {
        settings.credentials_file = credentials;
    }
    if let Some(level) = args.level {
        settings.level = level;
    }

    Ok(settings)
}
