//! The module contains the `Transaction` record and the `Ledger` store.

use serde::Serialize;

use crate::MoneyCents;

/// A recorded sale.
///
/// `date` and `time` keep the raw file spelling (`DD/MM/YYYY`, `HH:MM:SS`)
/// so historical rows round-trip byte-for-byte even when malformed; queries
/// parse them lazily and skip bad rows individually. `product_id` is a
/// foreign key in spirit only: the referenced product may have been renamed
/// or may no longer exist, and every consumer must tolerate that. `payment`
/// is the unit price at sale time multiplied by `quantity`; it is never
/// recomputed from the current catalog.
///
/// Serializes in the persisted column order `date,time,id,quantity,payment`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Transaction {
    pub date: String,
    pub time: String,
    #[serde(rename = "id")]
    pub product_id: String,
    pub quantity: u32,
    pub payment: MoneyCents,
}

/// The complete sales history, in insertion (append) order.
///
/// Append-only during a session; the only other write is the wholesale file
/// rewrite at sign-out, which lives outside the engine.
#[derive(Debug, Default)]
pub struct Ledger {
    transactions: Vec<Transaction>,
}

impl Ledger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ledger from records already coerced at the load boundary.
    #[must_use]
    pub fn from_transactions(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }

    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub(crate) fn append(&mut self, transaction: Transaction) -> &Transaction {
        self.transactions.push(transaction);
        &self.transactions[self.transactions.len() - 1]
    }
}
