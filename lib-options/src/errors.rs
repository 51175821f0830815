//! Vesting and exercise error types

use lib_ledger::LedgerError;
use lib_params::ParamError;
use lib_types::{Amount, GrantId};
use lib_wallet::WalletError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VestingError {
    #[error("Unknown grant {0}")]
    GrantNotFound(GrantId),

    #[error("Grant amount must be positive")]
    ZeroAmount,

    #[error("Vesting period must be at least one day, got {0}")]
    InvalidVestingPeriod(u32),

    #[error("Insufficient vested balance: available {available}, requested {requested}")]
    InsufficientVested { available: Amount, requested: Amount },

    #[error("No profit at current price: market {market} does not exceed strike {strike}")]
    NoProfit { market: Amount, strike: Amount },

    #[error("Cash pool cannot cover the exercise profit: have {have}, need {need}")]
    InsufficientPoolCash { have: Amount, need: Amount },

    /// The grant changed under us between read and write. The caller can
    /// retry; no tokens moved for the failed update.
    #[error("Grant {0} was updated concurrently")]
    ConcurrentUpdate(GrantId),

    #[error("Arithmetic overflow computing vesting amounts")]
    Overflow,

    #[error("Wallet error: {0}")]
    Wallet(#[from] WalletError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Parameter error: {0}")]
    Params(#[from] ParamError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type VestingResult<T> = Result<T, VestingError>;
