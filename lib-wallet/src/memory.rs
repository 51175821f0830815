//! In-memory wallet
//!
//! Reference `WalletSink` implementation backed by a lock-wrapped map.
//! Accounts are created implicitly on first credit; a debit against a
//! missing account reports a zero balance.

use async_trait::async_trait;
use lib_types::{Amount, Currency, UserId};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::{WalletError, WalletResult};
use crate::sink::WalletSink;

/// Thread-safe in-memory wallet, cheap to clone
#[derive(Debug, Clone, Default)]
pub struct MemoryWallet {
    accounts: Arc<RwLock<HashMap<UserId, HashMap<Currency, Amount>>>>,
}

impl MemoryWallet {
    /// Create an empty wallet
    pub fn new() -> Self {
        Self::default()
    }

    /// Synchronous balance lookup, handy in assertions
    pub fn balance(&self, user: &UserId, currency: Currency) -> Amount {
        self.accounts
            .read()
            .get(user)
            .and_then(|account| account.get(&currency))
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl WalletSink for MemoryWallet {
    async fn credit(
        &self,
        user: UserId,
        currency: Currency,
        amount: Amount,
        _memo: &str,
    ) -> WalletResult<()> {
        let mut accounts = self.accounts.write();
        let balance = accounts
            .entry(user)
            .or_default()
            .entry(currency)
            .or_insert(0);
        *balance = balance.checked_add(amount).ok_or(WalletError::Overflow)?;
        Ok(())
    }

    async fn debit(
        &self,
        user: UserId,
        currency: Currency,
        amount: Amount,
        _memo: &str,
    ) -> WalletResult<()> {
        let mut accounts = self.accounts.write();
        let balance = accounts
            .entry(user)
            .or_default()
            .entry(currency)
            .or_insert(0);
        if *balance < amount {
            return Err(WalletError::InsufficientBalance {
                currency,
                have: *balance,
                need: amount,
            });
        }
        *balance -= amount;
        Ok(())
    }

    async fn balances(&self, user: UserId) -> WalletResult<HashMap<Currency, Amount>> {
        Ok(self
            .accounts
            .read()
            .get(&user)
            .cloned()
            .unwrap_or_default())
    }
}
