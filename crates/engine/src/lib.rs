//! Core transaction/inventory logic for the Bottega point-of-sale.
//!
//! The engine owns the two in-memory stores, the [`Catalog`] of products
//! and the append-only [`Ledger`] of sales, and every rule that keeps them
//! consistent: stock never goes negative, ids stay unique, payments keep the
//! price recorded at sale time. It does no I/O: loading, saving, prompting
//! and rendering live in the `app` crate and talk to the engine through
//! plain owned state passed by reference.

pub use catalog::{Catalog, Product, UpdateReport};
pub use dates::MonthKey;
pub use error::EngineError;
pub use ledger::{Ledger, Transaction};
pub use money::MoneyCents;
pub use reports::{MonthlyBucket, ProductTotal};
pub use sale::sell;

mod catalog;
pub mod dates;
mod error;
mod ledger;
mod money;
pub mod reports;
mod sale;

type ResultEngine<T> = Result<T, EngineError>;
