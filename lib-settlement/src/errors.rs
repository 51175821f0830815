//! Settlement error types

use lib_ledger::LedgerError;
use lib_params::ParamError;
use lib_scoring::ScoringError;
use thiserror::Error;

use crate::record::DistributionRecord;

#[derive(Error, Debug)]
pub enum SettlementError {
    /// The period already has a distribution record. Carries the existing
    /// record so callers can inspect what actually happened.
    #[error("settlement already recorded for {}", .0.period)]
    AlreadySettled(Box<DistributionRecord>),

    #[error("Arithmetic overflow computing distribution")]
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

pub type SettlementResult<T> = Result<T, SettlementError>;
