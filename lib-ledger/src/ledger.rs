//! Append-only platform fund ledger
//!
//! The ledger tracks pooled platform funds per currency. It validates every
//! entry before persisting it, keeps a cached net balance per currency, and
//! can always reproduce that balance by folding the full log.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use lib_types::{format_amount, Amount, Currency, TxId};

use crate::errors::{LedgerError, LedgerResult};
use crate::store::{LedgerStore, MemoryLedgerStore};
use crate::transaction::{Transaction, TxDirection, TxFilter};

// ===== SUMMARY TYPES =====

/// Aggregate activity for one currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencySummary {
    pub currency: Currency,
    pub credits: Amount,
    pub debits: Amount,
    pub net: Amount,
    pub count: u64,
}

/// Whole-ledger activity report, one row per currency with entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub total_transactions: u64,
    pub per_currency: Vec<CurrencySummary>,
}

// ===== LEDGER =====

pub struct Ledger {
    store: Arc<dyn LedgerStore>,
    /// Net pool balance per currency, kept in sync with the log
    totals: Mutex<HashMap<Currency, Amount>>,
}

impl Ledger {
    /// Open a ledger over `store`, folding the existing log to rebuild balances
    pub fn open(store: Arc<dyn LedgerStore>) -> LedgerResult<Self> {
        let mut totals: HashMap<Currency, Amount> = HashMap::new();
        for tx in store.scan()? {
            let have = totals.get(&tx.currency).copied().unwrap_or(0);
            totals.insert(tx.currency, Self::fold_entry(have, &tx)?);
        }
        tracing::info!("Ledger opened with {} entries", store.len()?);
        Ok(Self {
            store,
            totals: Mutex::new(totals),
        })
    }

    /// Fresh ledger over an empty in-memory log
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(MemoryLedgerStore::new()),
            totals: Mutex::new(HashMap::new()),
        }
    }

    /// Validate and append one entry, returning its id.
    ///
    /// A rejected entry leaves both the log and the cached balances untouched.
    pub fn append(&self, tx: Transaction) -> LedgerResult<TxId> {
        // ===== Check 1: Amount must be positive =====
        if tx.amount == 0 {
            return Err(LedgerError::InvalidAmount("amount must be positive".to_string()));
        }

        let mut totals = self.totals.lock();
        let have = totals.get(&tx.currency).copied().unwrap_or(0);

        // ===== Check 2: Debits cannot overdraw the pool, credits cannot overflow =====
        let next = match tx.direction {
            TxDirection::Debit => {
                if have < tx.amount {
                    return Err(LedgerError::InsufficientBalance {
                        currency: tx.currency,
                        have,
                        need: tx.amount,
                    });
                }
                have - tx.amount
            }
            TxDirection::Credit => have.checked_add(tx.amount).ok_or(LedgerError::Overflow)?,
        };

        // ===== Persist, then update the cache =====
        self.store.append(&tx)?;
        totals.insert(tx.currency, next);

        tracing::debug!(
            "Ledger append: {} {} {} {} (pool now {})",
            tx.direction,
            tx.category,
            format_amount(tx.amount),
            tx.currency,
            format_amount(next)
        );
        Ok(tx.id)
    }

    /// Cached net pool balance for one currency
    pub fn balance(&self, currency: Currency) -> Amount {
        self.totals.lock().get(&currency).copied().unwrap_or(0)
    }

    /// Cached net pool balances for every currency with activity
    pub fn balances(&self) -> HashMap<Currency, Amount> {
        self.totals.lock().clone()
    }

    /// Recompute one balance by folding the full log (verification path)
    pub fn replay_balance(&self, currency: Currency) -> LedgerResult<Amount> {
        let mut have: Amount = 0;
        for tx in self.store.scan()? {
            if tx.currency != currency {
                continue;
            }
            have = Self::fold_entry(have, &tx)?;
        }
        Ok(have)
    }

    /// Entries matching `filter`, newest first
    pub fn query(&self, filter: &TxFilter) -> LedgerResult<Vec<Transaction>> {
        let log = self.store.scan()?;
        let mut matched: Vec<(usize, Transaction)> = log
            .into_iter()
            .enumerate()
            .filter(|(_, tx)| filter.matches(tx))
            .collect();
        // Append order breaks timestamp ties
        matched.sort_by(|a, b| (b.1.timestamp, b.0).cmp(&(a.1.timestamp, a.0)));

        let mut result: Vec<Transaction> = matched.into_iter().map(|(_, tx)| tx).collect();
        if let Some(limit) = filter.limit {
            result.truncate(limit);
        }
        Ok(result)
    }

    /// Per-currency credit/debit/net aggregates over the whole log
    pub fn summary(&self) -> LedgerResult<LedgerSummary> {
        let log = self.store.scan()?;
        let mut rows: HashMap<Currency, CurrencySummary> = HashMap::new();
        for tx in &log {
            let row = rows.entry(tx.currency).or_insert_with(|| CurrencySummary {
                currency: tx.currency,
                credits: 0,
                debits: 0,
                net: 0,
                count: 0,
            });
            match tx.direction {
                TxDirection::Credit => {
                    row.credits = row.credits.checked_add(tx.amount).ok_or(LedgerError::Overflow)?;
                }
                TxDirection::Debit => {
                    row.debits = row.debits.checked_add(tx.amount).ok_or(LedgerError::Overflow)?;
                }
            }
            row.count += 1;
        }

        let mut per_currency = Vec::with_capacity(rows.len());
        for currency in Currency::ALL {
            if let Some(mut row) = rows.remove(currency) {
                row.net = row.credits.checked_sub(row.debits).ok_or_else(|| {
                    LedgerError::CorruptedData(format!("{} debits exceed credits", currency))
                })?;
                per_currency.push(row);
            }
        }

        Ok(LedgerSummary {
            total_transactions: log.len() as u64,
            per_currency,
        })
    }

    /// Number of entries in the log
    pub fn len(&self) -> LedgerResult<usize> {
        self.store.len()
    }

    pub fn is_empty(&self) -> LedgerResult<bool> {
        self.store.is_empty()
    }

    fn fold_entry(have: Amount, tx: &Transaction) -> LedgerResult<Amount> {
        match tx.direction {
            TxDirection::Credit => have.checked_add(tx.amount).ok_or(LedgerError::Overflow),
            TxDirection::Debit => have.checked_sub(tx.amount).ok_or_else(|| {
                LedgerError::CorruptedData(format!("{} debit exceeds pool balance", tx.currency))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::TxCategory;
    use lib_types::UserId;

    fn ledger() -> Ledger {
        Ledger::in_memory()
    }

    #[test]
    fn test_credit_increases_pool_balance() {
        let ledger = ledger();
        ledger
            .append(Transaction::credit(TxCategory::Commission, Currency::Cash, 10_000, 1))
            .unwrap();
        assert_eq!(ledger.balance(Currency::Cash), 10_000);
        assert_eq!(ledger.balance(Currency::CoinA), 0);
    }

    #[test]
    fn test_debit_decreases_pool_balance() {
        let ledger = ledger();
        ledger
            .append(Transaction::credit(TxCategory::Commission, Currency::Cash, 10_000, 1))
            .unwrap();
        ledger
            .append(Transaction::debit(TxCategory::Dividend, Currency::Cash, 4_000, 2))
            .unwrap();
        assert_eq!(ledger.balance(Currency::Cash), 6_000);
    }

    #[test]
    fn test_zero_amount_rejected() {
        let ledger = ledger();
        let result = ledger.append(Transaction::credit(TxCategory::Commission, Currency::Cash, 0, 1));
        assert!(matches!(result, Err(LedgerError::InvalidAmount(_))));
        assert_eq!(ledger.len().unwrap(), 0);
    }

    #[test]
    fn test_overdraft_rejected_and_log_untouched() {
        let ledger = ledger();
        ledger
            .append(Transaction::credit(TxCategory::Commission, Currency::Cash, 100, 1))
            .unwrap();
        let result = ledger.append(Transaction::debit(TxCategory::Dividend, Currency::Cash, 101, 2));
        match result {
            Err(LedgerError::InsufficientBalance { currency, have, need }) => {
                assert_eq!(currency, Currency::Cash);
                assert_eq!(have, 100);
                assert_eq!(need, 101);
            }
            other => panic!("expected InsufficientBalance, got {:?}", other),
        }
        assert_eq!(ledger.len().unwrap(), 1);
        assert_eq!(ledger.balance(Currency::Cash), 100);
    }

    #[test]
    fn test_currencies_are_tracked_independently() {
        let ledger = ledger();
        ledger
            .append(Transaction::credit(TxCategory::Commission, Currency::Cash, 500, 1))
            .unwrap();
        ledger
            .append(Transaction::credit(TxCategory::Reward, Currency::CoinA, 900, 2))
            .unwrap();
        ledger
            .append(Transaction::debit(TxCategory::Reward, Currency::CoinA, 900, 3))
            .unwrap();

        let balances = ledger.balances();
        assert_eq!(balances.get(&Currency::Cash), Some(&500));
        assert_eq!(balances.get(&Currency::CoinA), Some(&0));
        assert_eq!(balances.get(&Currency::CoinO), None);
    }

    #[test]
    fn test_replay_matches_cache_after_mixed_activity() {
        let ledger = ledger();
        ledger
            .append(Transaction::credit(TxCategory::Commission, Currency::Cash, 1_000, 1))
            .unwrap();
        ledger
            .append(Transaction::debit(TxCategory::Dividend, Currency::Cash, 250, 2))
            .unwrap();
        ledger
            .append(Transaction::credit(TxCategory::Purchase, Currency::Cash, 42, 3))
            .unwrap();

        assert_eq!(ledger.replay_balance(Currency::Cash).unwrap(), 792);
        assert_eq!(ledger.balance(Currency::Cash), 792);
    }

    #[test]
    fn test_open_replays_existing_log() {
        let store = Arc::new(MemoryLedgerStore::new());
        store
            .append(&Transaction::credit(TxCategory::Commission, Currency::Cash, 77, 1))
            .unwrap();
        store
            .append(&Transaction::credit(TxCategory::Reward, Currency::CoinA, 33, 2))
            .unwrap();

        let ledger = Ledger::open(store).unwrap();
        assert_eq!(ledger.balance(Currency::Cash), 77);
        assert_eq!(ledger.balance(Currency::CoinA), 33);
    }

    #[test]
    fn test_open_rejects_log_that_overdraws() {
        let store = Arc::new(MemoryLedgerStore::new());
        store
            .append(&Transaction::debit(TxCategory::Dividend, Currency::Cash, 10, 1))
            .unwrap();
        let result = Ledger::open(store);
        assert!(matches!(result, Err(LedgerError::CorruptedData(_))));
    }

    #[test]
    fn test_query_newest_first_with_limit() {
        let ledger = ledger();
        for i in 1..=5u64 {
            ledger
                .append(Transaction::credit(TxCategory::Commission, Currency::Cash, i as u128, i))
                .unwrap();
        }
        let result = ledger.query(&TxFilter::new().with_limit(2)).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].timestamp, 5);
        assert_eq!(result[1].timestamp, 4);
    }

    #[test]
    fn test_query_tie_break_is_append_order() {
        let ledger = ledger();
        let first = ledger
            .append(Transaction::credit(TxCategory::Commission, Currency::Cash, 1, 9))
            .unwrap();
        let second = ledger
            .append(Transaction::credit(TxCategory::Commission, Currency::Cash, 2, 9))
            .unwrap();

        let result = ledger.query(&TxFilter::new()).unwrap();
        assert_eq!(result[0].id, second);
        assert_eq!(result[1].id, first);
    }

    #[test]
    fn test_query_by_correlation_and_actor() {
        let ledger = ledger();
        let correlation = TxId::random();
        let user = UserId::new([3u8; 32]);
        ledger
            .append(
                Transaction::credit(TxCategory::Reward, Currency::CoinA, 10, 1)
                    .with_correlation(correlation)
                    .with_actor(user),
            )
            .unwrap();
        ledger
            .append(Transaction::credit(TxCategory::Reward, Currency::CoinA, 20, 2))
            .unwrap();

        let by_correlation = ledger
            .query(&TxFilter::new().with_correlation(correlation))
            .unwrap();
        assert_eq!(by_correlation.len(), 1);
        assert_eq!(by_correlation[0].amount, 10);

        let by_actor = ledger.query(&TxFilter::new().with_actor(user)).unwrap();
        assert_eq!(by_actor.len(), 1);
        assert_eq!(by_actor[0].amount, 10);
    }

    #[test]
    fn test_summary_aggregates_per_currency() {
        let ledger = ledger();
        ledger
            .append(Transaction::credit(TxCategory::Commission, Currency::Cash, 1_000, 1))
            .unwrap();
        ledger
            .append(Transaction::debit(TxCategory::Dividend, Currency::Cash, 300, 2))
            .unwrap();
        ledger
            .append(Transaction::credit(TxCategory::Vesting, Currency::CoinO, 50, 3))
            .unwrap();

        let summary = ledger.summary().unwrap();
        assert_eq!(summary.total_transactions, 3);
        assert_eq!(summary.per_currency.len(), 2);

        let cash = &summary.per_currency[0];
        assert_eq!(cash.currency, Currency::Cash);
        assert_eq!(cash.credits, 1_000);
        assert_eq!(cash.debits, 300);
        assert_eq!(cash.net, 700);
        assert_eq!(cash.count, 2);

        let coin_o = &summary.per_currency[1];
        assert_eq!(coin_o.currency, Currency::CoinO);
        assert_eq!(coin_o.net, 50);
        assert_eq!(coin_o.count, 1);
    }

    #[test]
    fn test_append_returns_the_entry_id() {
        let ledger = ledger();
        let tx = Transaction::credit(TxCategory::Commission, Currency::Cash, 5, 1);
        let expected = tx.id;
        let id = ledger.append(tx).unwrap();
        assert_eq!(id, expected);
    }
}
