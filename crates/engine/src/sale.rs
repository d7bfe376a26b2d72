//! The sale engine: the one operation that mutates both stores.

use chrono::NaiveDateTime;

use crate::{
    Catalog, EngineError, Ledger, ResultEngine, Transaction,
    dates::{DATE_FORMAT, TIME_FORMAT},
};

/// Validates and executes a purchase.
///
/// Failure conditions, checked in order:
///
/// 1. the product id must exist ([`EngineError::NotFound`]);
/// 2. the quantity must be a positive integer ([`EngineError::InvalidQuantity`]);
/// 3. the quantity must not exceed current stock
///    ([`EngineError::InsufficientStock`]; no partial fulfillment).
///
/// On success the payment is computed in cents from the unit price at sale
/// time, a transaction stamped from `at` is appended to the ledger, and the
/// product's stock is decremented in place. The append and the decrement are
/// one logical step: within the single-threaded session no intermediate
/// state is observable. Any failure leaves both stores untouched.
pub fn sell(
    catalog: &mut Catalog,
    ledger: &mut Ledger,
    product_id: &str,
    quantity: i64,
    at: NaiveDateTime,
) -> ResultEngine<Transaction> {
    let product = catalog
        .find_by_id_mut(product_id)
        .ok_or_else(|| EngineError::NotFound(product_id.trim().to_string()))?;

    if quantity <= 0 {
        return Err(EngineError::InvalidQuantity(format!(
            "quantity must be greater than zero, got {quantity}"
        )));
    }
    let quantity = u32::try_from(quantity).map_err(|_| {
        EngineError::InvalidQuantity(format!("quantity out of range: {quantity}"))
    })?;

    if quantity > product.stock {
        return Err(EngineError::InsufficientStock(format!(
            "requested {quantity} of \"{}\", only {} in stock",
            product.name, product.stock
        )));
    }

    let transaction = Transaction {
        date: at.format(DATE_FORMAT).to_string(),
        time: at.format(TIME_FORMAT).to_string(),
        product_id: product.id.clone(),
        quantity,
        payment: product.price.times(quantity),
    };

    product.stock -= quantity;
    tracing::debug!(
        product = %product.id,
        quantity,
        payment = %transaction.payment,
        remaining = product.stock,
        "sale recorded"
    );

    Ok(ledger.append(transaction).clone())
}
