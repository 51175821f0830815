//! Wallet Errors

use lib_types::{Amount, Currency};
use thiserror::Error;

/// Error reported by a wallet sink
#[derive(Error, Debug, Clone)]
pub enum WalletError {
    #[error("Insufficient wallet balance for {currency}: have {have}, need {need}")]
    InsufficientBalance {
        currency: Currency,
        have: Amount,
        need: Amount,
    },

    #[error("Wallet balance overflow")]
    Overflow,

    #[error("Wallet service unavailable: {0}")]
    Unavailable(String),
}

impl WalletError {
    /// Transient errors are worth retrying; the rest are permanent
    pub fn is_transient(&self) -> bool {
        matches!(self, WalletError::Unavailable(_))
    }
}

/// Result type for wallet operations
pub type WalletResult<T> = Result<T, WalletError>;
