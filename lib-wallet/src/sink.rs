//! Wallet Sink Contract
//!
//! The engines never mutate user balances directly. Every spendable-balance
//! change goes through a `WalletSink` owned by the embedding application,
//! which may be an in-process wallet, an RPC client, or a test double.
//!
//! Sink calls are wrapped in a bounded [`RetryPolicy`]: transient failures
//! are retried with a fixed backoff, permanent failures surface immediately.

use async_trait::async_trait;
use lib_types::{Amount, Currency, UserId};
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use crate::errors::{WalletError, WalletResult};

/// External wallet service consumed by the economy engines
#[async_trait]
pub trait WalletSink: Send + Sync {
    /// Credit `amount` of `currency` to the user's spendable balance
    async fn credit(
        &self,
        user: UserId,
        currency: Currency,
        amount: Amount,
        memo: &str,
    ) -> WalletResult<()>;

    /// Debit `amount` of `currency` from the user's spendable balance
    async fn debit(
        &self,
        user: UserId,
        currency: Currency,
        amount: Amount,
        memo: &str,
    ) -> WalletResult<()>;

    /// Current spendable balances for the user
    async fn balances(&self, user: UserId) -> WalletResult<HashMap<Currency, Amount>>;
}

/// Bounded retry with fixed backoff for wallet sink calls
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub attempts: u32,
    /// Sleep between attempts
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff: Duration::from_millis(50),
        }
    }
}

impl RetryPolicy {
    /// Policy with a custom attempt budget and the default backoff
    pub fn with_attempts(attempts: u32) -> Self {
        Self {
            attempts: attempts.max(1),
            ..Self::default()
        }
    }

    /// Run `op` until it succeeds, fails permanently, or the attempt
    /// budget is exhausted. Only transient errors are retried.
    pub async fn run<T, F, Fut>(&self, label: &str, op: F) -> WalletResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = WalletResult<T>>,
    {
        let attempts = self.attempts.max(1);
        for attempt in 1..=attempts {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < attempts => {
                    tracing::warn!(
                        "{} attempt {}/{} failed: {}; retrying",
                        label,
                        attempt,
                        attempts,
                        err
                    );
                    tokio::time::sleep(self.backoff).await;
                }
                Err(err) => return Err(err),
            }
        }
        // The loop always returns; this only guards against attempts == 0.
        Err(WalletError::Unavailable("retry budget exhausted".to_string()))
    }
}
