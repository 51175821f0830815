//! Dividend error types

use lib_ledger::LedgerError;
use lib_params::ParamError;
use lib_scoring::ScoringError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DividendError {
    #[error("Arithmetic overflow computing dividend amounts")]
    Overflow,

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Parameter error: {0}")]
    Params(#[from] ParamError),

    #[error("Scoring error: {0}")]
    Scoring(#[from] ScoringError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type DividendResult<T> = Result<T, DividendError>;
