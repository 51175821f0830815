//! Sled-backed dividend store
//!
//! Weight records are plain upserts (recalculation replaces), payout marks
//! are compare-and-swap inserts (a payout can only be applied once).

use sled::{Db, Tree};
use std::path::Path;

use lib_types::{Amount, PeriodId, UserId};

use crate::errors::{DividendError, DividendResult};
use crate::record::DividendWeightRecord;
use crate::store::{keys, WeightStore};

// Tree names. FIXED - DO NOT CHANGE: renaming orphans existing data.
const TREE_WEIGHTS: &str = "dividend_weights";
const TREE_PAYOUTS: &str = "dividend_payouts";

pub struct SledWeightStore {
    #[allow(dead_code)]
    db: Db,
    weights: Tree,
    payouts: Tree,
}

impl SledWeightStore {
    /// Open (or create) a durable store at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> DividendResult<Self> {
        let db = sled::open(path).map_err(|e| DividendError::Storage(e.to_string()))?;
        Self::with_db(db)
    }

    /// Open a throwaway store backed by a temporary sled database
    pub fn open_temporary() -> DividendResult<Self> {
        let db = sled::Config::new()
            .temporary(true)
            .open()
            .map_err(|e| DividendError::Storage(e.to_string()))?;
        Self::with_db(db)
    }

    fn with_db(db: Db) -> DividendResult<Self> {
        let weights = db
            .open_tree(TREE_WEIGHTS)
            .map_err(|e| DividendError::Storage(e.to_string()))?;
        let payouts = db
            .open_tree(TREE_PAYOUTS)
            .map_err(|e| DividendError::Storage(e.to_string()))?;
        Ok(Self { db, weights, payouts })
    }

    /// Block until all writes are on disk
    pub fn flush(&self) -> DividendResult<()> {
        self.weights
            .flush()
            .map_err(|e| DividendError::Storage(e.to_string()))?;
        self.payouts
            .flush()
            .map_err(|e| DividendError::Storage(e.to_string()))?;
        Ok(())
    }
}

impl WeightStore for SledWeightStore {
    fn put_weight(&self, record: &DividendWeightRecord) -> DividendResult<()> {
        let bytes =
            bincode::serialize(record).map_err(|e| DividendError::Serialization(e.to_string()))?;
        self.weights
            .insert(keys::weight_key(record.period, record.user), bytes)
            .map_err(|e| DividendError::Storage(e.to_string()))?;
        Ok(())
    }

    fn weight(&self, user: UserId, period: PeriodId) -> DividendResult<Option<DividendWeightRecord>> {
        match self
            .weights
            .get(keys::weight_key(period, user))
            .map_err(|e| DividendError::Storage(e.to_string()))?
        {
            Some(bytes) => Ok(Some(
                bincode::deserialize(&bytes)
                    .map_err(|e| DividendError::Serialization(e.to_string()))?,
            )),
            None => Ok(None),
        }
    }

    fn weights_for(&self, period: PeriodId) -> DividendResult<Vec<DividendWeightRecord>> {
        let mut records = Vec::new();
        for item in self.weights.scan_prefix(keys::period_prefix(period)) {
            let (_, value) = item.map_err(|e| DividendError::Storage(e.to_string()))?;
            records.push(
                bincode::deserialize(&value)
                    .map_err(|e| DividendError::Serialization(e.to_string()))?,
            );
        }
        Ok(records)
    }

    fn mark_payout(&self, period: PeriodId, user: UserId, amount: Amount) -> DividendResult<bool> {
        let bytes =
            bincode::serialize(&amount).map_err(|e| DividendError::Serialization(e.to_string()))?;
        let outcome = self
            .payouts
            .compare_and_swap(keys::weight_key(period, user), None as Option<&[u8]>, Some(bytes))
            .map_err(|e| DividendError::Storage(e.to_string()))?;
        Ok(outcome.is_ok())
    }

    fn payout(&self, period: PeriodId, user: UserId) -> DividendResult<Option<Amount>> {
        match self
            .payouts
            .get(keys::weight_key(period, user))
            .map_err(|e| DividendError::Storage(e.to_string()))?
        {
            Some(bytes) => Ok(Some(
                bincode::deserialize(&bytes)
                    .map_err(|e| DividendError::Serialization(e.to_string()))?,
            )),
            None => Ok(None),
        }
    }
}
