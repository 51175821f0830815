//! Ledger error types

use lib_types::{Amount, Currency};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Insufficient {currency} in platform pool: have {have}, need {need}")]
    InsufficientBalance {
        currency: Currency,
        have: Amount,
        need: Amount,
    },

    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Corrupted ledger data: {0}")]
    CorruptedData(String),
}

pub type LedgerResult<T> = Result<T, LedgerError>;
