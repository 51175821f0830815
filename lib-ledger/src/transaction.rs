//! Ledger transaction model
//!
//! Every platform fund movement is one immutable `Transaction`. Entries are
//! never updated or deleted once appended; corrections are new entries.

use lib_types::{Amount, Currency, TxId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

// ===== DIRECTION =====

/// Whether an entry adds to or removes from a platform pool.
///
/// Discriminants are persisted inside serialized transactions.
/// FIXED - DO NOT CHANGE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum TxDirection {
    /// Funds flowing into the platform pool
    Credit = 1,
    /// Funds flowing out of the platform pool
    Debit = 2,
}

impl TxDirection {
    pub const ALL: [TxDirection; 2] = [TxDirection::Credit, TxDirection::Debit];

    pub fn as_str(&self) -> &'static str {
        match self {
            TxDirection::Credit => "credit",
            TxDirection::Debit => "debit",
        }
    }
}

impl fmt::Display for TxDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ===== CATEGORY =====

/// Business reason for a fund movement.
///
/// Closed set. Discriminants are persisted inside serialized transactions.
/// FIXED - DO NOT CHANGE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum TxCategory {
    /// Platform commission collected from marketplace activity
    Commission = 1,
    /// Contribution reward paid out of a settlement pool
    Reward = 2,
    /// Cash dividend paid against historical performance weights
    Dividend = 3,
    /// Option tokens released on a vesting schedule
    Vesting = 4,
    /// Option tokens converted to cash profit
    Exercise = 5,
    /// Direct purchase revenue
    Purchase = 6,
    /// Generic pool transfer
    Transfer = 7,
}

impl TxCategory {
    pub const ALL: [TxCategory; 7] = [
        TxCategory::Commission,
        TxCategory::Reward,
        TxCategory::Dividend,
        TxCategory::Vesting,
        TxCategory::Exercise,
        TxCategory::Purchase,
        TxCategory::Transfer,
    ];

    pub const COUNT: usize = 7;

    pub fn as_str(&self) -> &'static str {
        match self {
            TxCategory::Commission => "commission",
            TxCategory::Reward => "reward",
            TxCategory::Dividend => "dividend",
            TxCategory::Vesting => "vesting",
            TxCategory::Exercise => "exercise",
            TxCategory::Purchase => "purchase",
            TxCategory::Transfer => "transfer",
        }
    }

    pub const fn discriminant(&self) -> u8 {
        *self as u8
    }

    pub fn from_discriminant(value: u8) -> Option<Self> {
        match value {
            1 => Some(TxCategory::Commission),
            2 => Some(TxCategory::Reward),
            3 => Some(TxCategory::Dividend),
            4 => Some(TxCategory::Vesting),
            5 => Some(TxCategory::Exercise),
            6 => Some(TxCategory::Purchase),
            7 => Some(TxCategory::Transfer),
            _ => None,
        }
    }
}

impl fmt::Display for TxCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ===== TRANSACTION =====

/// One immutable ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique entry id
    pub id: TxId,
    pub direction: TxDirection,
    pub category: TxCategory,
    pub currency: Currency,
    /// Atomic units, always positive
    pub amount: Amount,
    /// Unix seconds
    pub timestamp: u64,
    /// Groups the entries produced by one engine operation
    pub correlation: Option<TxId>,
    /// User on whose behalf the movement happened, if any
    pub actor: Option<UserId>,
}

impl Transaction {
    pub fn new(
        direction: TxDirection,
        category: TxCategory,
        currency: Currency,
        amount: Amount,
        timestamp: u64,
    ) -> Self {
        Self {
            id: TxId::random(),
            direction,
            category,
            currency,
            amount,
            timestamp,
            correlation: None,
            actor: None,
        }
    }

    pub fn credit(category: TxCategory, currency: Currency, amount: Amount, timestamp: u64) -> Self {
        Self::new(TxDirection::Credit, category, currency, amount, timestamp)
    }

    pub fn debit(category: TxCategory, currency: Currency, amount: Amount, timestamp: u64) -> Self {
        Self::new(TxDirection::Debit, category, currency, amount, timestamp)
    }

    /// Replace the random id with a deterministic one (idempotent appends)
    pub fn with_id(mut self, id: TxId) -> Self {
        self.id = id;
        self
    }

    pub fn with_correlation(mut self, correlation: TxId) -> Self {
        self.correlation = Some(correlation);
        self
    }

    pub fn with_actor(mut self, actor: UserId) -> Self {
        self.actor = Some(actor);
        self
    }
}

// ===== FILTER =====

/// Conjunctive query filter over ledger history.
///
/// Every populated field must match; `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TxFilter {
    pub direction: Option<TxDirection>,
    pub category: Option<TxCategory>,
    pub currency: Option<Currency>,
    pub actor: Option<UserId>,
    pub correlation: Option<TxId>,
    /// Inclusive lower bound on timestamp
    pub from_ts: Option<u64>,
    /// Inclusive upper bound on timestamp
    pub to_ts: Option<u64>,
    pub min_amount: Option<Amount>,
    pub max_amount: Option<Amount>,
    /// Maximum number of entries to return, newest first
    pub limit: Option<usize>,
}

impl TxFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_direction(mut self, direction: TxDirection) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn with_category(mut self, category: TxCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = Some(currency);
        self
    }

    pub fn with_actor(mut self, actor: UserId) -> Self {
        self.actor = Some(actor);
        self
    }

    pub fn with_correlation(mut self, correlation: TxId) -> Self {
        self.correlation = Some(correlation);
        self
    }

    pub fn with_time_range(mut self, from_ts: u64, to_ts: u64) -> Self {
        self.from_ts = Some(from_ts);
        self.to_ts = Some(to_ts);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// True when `tx` satisfies every populated predicate (limit excluded)
    pub fn matches(&self, tx: &Transaction) -> bool {
        if let Some(direction) = self.direction {
            if tx.direction != direction {
                return false;
            }
        }
        if let Some(category) = self.category {
            if tx.category != category {
                return false;
            }
        }
        if let Some(currency) = self.currency {
            if tx.currency != currency {
                return false;
            }
        }
        if let Some(actor) = self.actor {
            if tx.actor != Some(actor) {
                return false;
            }
        }
        if let Some(correlation) = self.correlation {
            if tx.correlation != Some(correlation) {
                return false;
            }
        }
        if let Some(from_ts) = self.from_ts {
            if tx.timestamp < from_ts {
                return false;
            }
        }
        if let Some(to_ts) = self.to_ts {
            if tx.timestamp > to_ts {
                return false;
            }
        }
        if let Some(min_amount) = self.min_amount {
            if tx.amount < min_amount {
                return false;
            }
        }
        if let Some(max_amount) = self.max_amount {
            if tx.amount > max_amount {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tx() -> Transaction {
        Transaction::credit(TxCategory::Commission, Currency::Cash, 5_000, 1_700_000_000)
            .with_actor(UserId::new([7u8; 32]))
    }

    #[test]
    fn test_category_discriminants_are_stable() {
        assert_eq!(TxCategory::Commission.discriminant(), 1);
        assert_eq!(TxCategory::Reward.discriminant(), 2);
        assert_eq!(TxCategory::Dividend.discriminant(), 3);
        assert_eq!(TxCategory::Vesting.discriminant(), 4);
        assert_eq!(TxCategory::Exercise.discriminant(), 5);
        assert_eq!(TxCategory::Purchase.discriminant(), 6);
        assert_eq!(TxCategory::Transfer.discriminant(), 7);
    }

    #[test]
    fn test_category_roundtrip_via_discriminant() {
        for category in TxCategory::ALL {
            assert_eq!(TxCategory::from_discriminant(category.discriminant()), Some(category));
        }
        assert_eq!(TxCategory::from_discriminant(0), None);
        assert_eq!(TxCategory::from_discriminant(8), None);
    }

    #[test]
    fn test_all_matches_count() {
        assert_eq!(TxCategory::ALL.len(), TxCategory::COUNT);
    }

    #[test]
    fn test_display_strings() {
        assert_eq!(TxDirection::Credit.to_string(), "credit");
        assert_eq!(TxDirection::Debit.to_string(), "debit");
        assert_eq!(TxCategory::Dividend.to_string(), "dividend");
    }

    #[test]
    fn test_builders_set_optional_fields() {
        let correlation = TxId::random();
        let tx = Transaction::debit(TxCategory::Reward, Currency::CoinA, 100, 42)
            .with_correlation(correlation)
            .with_actor(UserId::new([1u8; 32]));
        assert_eq!(tx.direction, TxDirection::Debit);
        assert_eq!(tx.correlation, Some(correlation));
        assert_eq!(tx.actor, Some(UserId::new([1u8; 32])));
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(TxFilter::new().matches(&sample_tx()));
    }

    #[test]
    fn test_filter_by_category_and_currency() {
        let tx = sample_tx();
        assert!(TxFilter::new()
            .with_category(TxCategory::Commission)
            .with_currency(Currency::Cash)
            .matches(&tx));
        assert!(!TxFilter::new().with_category(TxCategory::Reward).matches(&tx));
        assert!(!TxFilter::new().with_currency(Currency::CoinA).matches(&tx));
    }

    #[test]
    fn test_filter_time_range_is_inclusive() {
        let tx = sample_tx();
        assert!(TxFilter::new()
            .with_time_range(tx.timestamp, tx.timestamp)
            .matches(&tx));
        assert!(!TxFilter::new()
            .with_time_range(tx.timestamp + 1, tx.timestamp + 10)
            .matches(&tx));
        assert!(!TxFilter::new()
            .with_time_range(tx.timestamp - 10, tx.timestamp - 1)
            .matches(&tx));
    }

    #[test]
    fn test_filter_by_actor() {
        let tx = sample_tx();
        assert!(TxFilter::new().with_actor(UserId::new([7u8; 32])).matches(&tx));
        assert!(!TxFilter::new().with_actor(UserId::new([8u8; 32])).matches(&tx));
    }

    #[test]
    fn test_filter_amount_bounds() {
        let tx = sample_tx();
        let mut filter = TxFilter::new();
        filter.min_amount = Some(5_000);
        filter.max_amount = Some(5_000);
        assert!(filter.matches(&tx));
        filter.min_amount = Some(5_001);
        assert!(!filter.matches(&tx));
    }

    #[test]
    fn test_transaction_bincode_roundtrip() {
        let tx = sample_tx().with_correlation(TxId::random());
        let bytes = bincode::serialize(&tx).unwrap();
        let decoded: Transaction = bincode::deserialize(&bytes).unwrap();
        assert_eq!(decoded, tx);
    }
}
