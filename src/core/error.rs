//! Errors raised by ledger mutations.
//!
//! These are reported to the user and abort the triggering action. Remote and
//! local persistence failures never show up here: they are logged and absorbed
//! by the session.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Record {0} not found")]
    NotFound(u64),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}
