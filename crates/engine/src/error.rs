//! The module contains the errors the ledger engine can raise.
//!
//! Validation, conflict and duplicate errors are raised before any mutation
//! is applied; persistence errors surface before the in-memory snapshot is
//! replaced, so callers never observe state that is not durable.

use sea_orm::DbErr;
use thiserror::Error;

/// Ledger engine errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Malformed or out-of-range input (non-positive total, partial payment
    /// without a customer name, ...).
    #[error("invalid input: {0}")]
    Validation(String),
    /// The id a mutation targets does not exist.
    #[error("\"{0}\" not found")]
    NotFound(String),
    /// A delete is blocked by a referencing entity.
    #[error("conflict: {0}")]
    Conflict(String),
    /// A second return recorded for an already-returned sale.
    #[error("duplicate operation: {0}")]
    DuplicateOperation(String),
    #[error(transparent)]
    Persistence(#[from] DbErr),
}

impl PartialEq for LedgerError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::DuplicateOperation(a), Self::DuplicateOperation(b)) => a == b,
            (Self::Persistence(a), Self::Persistence(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
