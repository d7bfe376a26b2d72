//! The module contains the errors the engine can throw.
//!
//! Every failure here is recoverable by design: the calling shell decides
//! whether to reprompt or drop back to the menu. Nothing in the engine is
//! fatal to the process.
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EngineError {
    #[error("\"{0}\" not found!")]
    NotFound(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("\"{0}\" already present!")]
    DuplicateName(String),
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),
    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),
    #[error("Invalid price: {0}")]
    InvalidPrice(String),
    #[error("Invalid stock: {0}")]
    InvalidStock(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid range: {0}")]
    InvalidRange(String),
}
