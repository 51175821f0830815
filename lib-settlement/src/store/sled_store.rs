//! Sled-backed settlement store
//!
//! Two trees: distribution records keyed by period, payout marks keyed by
//! period then user. Both inserts are compare-and-swap against an empty
//! slot, which is what makes settlement idempotent across processes.

use sled::{Db, Tree};
use std::path::Path;

use lib_types::{Amount, PeriodId, UserId};

use crate::errors::{SettlementError, SettlementResult};
use crate::record::DistributionRecord;
use crate::store::{keys, SettlementStore};

// Tree names. FIXED - DO NOT CHANGE: renaming orphans existing data.
const TREE_RECORDS: &str = "distribution_records";
const TREE_PAYOUTS: &str = "settlement_payouts";

pub struct SledSettlementStore {
    #[allow(dead_code)]
    db: Db,
    records: Tree,
    payouts: Tree,
}

impl SledSettlementStore {
    /// Open (or create) a durable store at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> SettlementResult<Self> {
        let db = sled::open(path).map_err(|e| SettlementError::Storage(e.to_string()))?;
        Self::with_db(db)
    }

    /// Open a throwaway store backed by a temporary sled database
    pub fn open_temporary() -> SettlementResult<Self> {
        let db = sled::Config::new()
            .temporary(true)
            .open()
            .map_err(|e| SettlementError::Storage(e.to_string()))?;
        Self::with_db(db)
    }

    fn with_db(db: Db) -> SettlementResult<Self> {
        let records = db
            .open_tree(TREE_RECORDS)
            .map_err(|e| SettlementError::Storage(e.to_string()))?;
        let payouts = db
            .open_tree(TREE_PAYOUTS)
            .map_err(|e| SettlementError::Storage(e.to_string()))?;
        Ok(Self { db, records, payouts })
    }

    /// Block until all writes are on disk
    pub fn flush(&self) -> SettlementResult<()> {
        self.records
            .flush()
            .map_err(|e| SettlementError::Storage(e.to_string()))?;
        self.payouts
            .flush()
            .map_err(|e| SettlementError::Storage(e.to_string()))?;
        Ok(())
    }

    fn insert_if_absent(tree: &Tree, key: &[u8], bytes: Vec<u8>) -> SettlementResult<bool> {
        let outcome = tree
            .compare_and_swap(key, None as Option<&[u8]>, Some(bytes))
            .map_err(|e| SettlementError::Storage(e.to_string()))?;
        Ok(outcome.is_ok())
    }
}

impl SettlementStore for SledSettlementStore {
    fn insert_record(&self, record: &DistributionRecord) -> SettlementResult<bool> {
        let bytes =
            bincode::serialize(record).map_err(|e| SettlementError::Serialization(e.to_string()))?;
        Self::insert_if_absent(&self.records, &keys::record_key(record.period), bytes)
    }

    fn get_record(&self, period: PeriodId) -> SettlementResult<Option<DistributionRecord>> {
        match self
            .records
            .get(keys::record_key(period))
            .map_err(|e| SettlementError::Storage(e.to_string()))?
        {
            Some(bytes) => Ok(Some(
                bincode::deserialize(&bytes)
                    .map_err(|e| SettlementError::Serialization(e.to_string()))?,
            )),
            None => Ok(None),
        }
    }

    fn mark_payout(&self, period: PeriodId, user: UserId, amount: Amount) -> SettlementResult<bool> {
        let bytes =
            bincode::serialize(&amount).map_err(|e| SettlementError::Serialization(e.to_string()))?;
        Self::insert_if_absent(&self.payouts, &keys::payout_key(period, user), bytes)
    }

    fn payout(&self, period: PeriodId, user: UserId) -> SettlementResult<Option<Amount>> {
        match self
            .payouts
            .get(keys::payout_key(period, user))
            .map_err(|e| SettlementError::Storage(e.to_string()))?
        {
            Some(bytes) => Ok(Some(
                bincode::deserialize(&bytes)
                    .map_err(|e| SettlementError::Serialization(e.to_string()))?,
            )),
            None => Ok(None),
        }
    }

    fn payouts_for(&self, period: PeriodId) -> SettlementResult<Vec<(UserId, Amount)>> {
        let mut payouts = Vec::new();
        for item in self.payouts.scan_prefix(keys::period_prefix(period)) {
            let (key, value) = item.map_err(|e| SettlementError::Storage(e.to_string()))?;
            let (_, user) = keys::parse_payout_key(&key).ok_or_else(|| {
                SettlementError::Storage(format!("malformed payout key: {} bytes", key.len()))
            })?;
            let amount: Amount = bincode::deserialize(&value)
                .map_err(|e| SettlementError::Serialization(e.to_string()))?;
            payouts.push((user, amount));
        }
        Ok(payouts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::SettlementStatus;

    fn record(period: PeriodId) -> DistributionRecord {
        DistributionRecord {
            period,
            income_base: 100_000,
            pool: 40_000,
            recipients: Vec::new(),
            status: SettlementStatus::Completed,
            reason: None,
            settled_at: 7,
        }
    }

    #[test]
    fn test_record_roundtrip_and_uniqueness() {
        let store = SledSettlementStore::open_temporary().unwrap();
        let period = PeriodId::from_ymd(2026, 3, 1).unwrap();

        assert!(store.insert_record(&record(period)).unwrap());
        assert!(!store.insert_record(&record(period)).unwrap());

        let stored = store.get_record(period).unwrap().unwrap();
        assert_eq!(stored, record(period));
    }

    #[test]
    fn test_payout_marks_roundtrip() {
        let store = SledSettlementStore::open_temporary().unwrap();
        let period = PeriodId::from_ymd(2026, 3, 1).unwrap();
        let user = UserId::new([5u8; 32]);

        assert_eq!(store.payout(period, user).unwrap(), None);
        assert!(store.mark_payout(period, user, 12_345).unwrap());
        assert!(!store.mark_payout(period, user, 99).unwrap());
        assert_eq!(store.payout(period, user).unwrap(), Some(12_345));
    }

    #[test]
    fn test_payouts_for_scans_one_period_only() {
        let store = SledSettlementStore::open_temporary().unwrap();
        let march = PeriodId::from_ymd(2026, 3, 1).unwrap();
        let next = PeriodId::from_ymd(2026, 3, 2).unwrap();
        store.mark_payout(march, UserId::new([1u8; 32]), 10).unwrap();
        store.mark_payout(next, UserId::new([2u8; 32]), 20).unwrap();

        let payouts = store.payouts_for(march).unwrap();
        assert_eq!(payouts, vec![(UserId::new([1u8; 32]), 10)]);
    }

    #[test]
    fn test_records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let period = PeriodId::from_ymd(2026, 3, 1).unwrap();
        {
            let store = SledSettlementStore::open(dir.path()).unwrap();
            store.insert_record(&record(period)).unwrap();
            store.flush().unwrap();
        }
        let store = SledSettlementStore::open(dir.path()).unwrap();
        assert!(store.get_record(period).unwrap().is_some());
        assert!(!store.insert_record(&record(period)).unwrap());
    }
}
