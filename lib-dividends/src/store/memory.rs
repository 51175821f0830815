//! In-memory dividend store for tests and ephemeral deployments

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

use lib_types::{Amount, PeriodId, UserId};

use crate::errors::DividendResult;
use crate::record::DividendWeightRecord;
use crate::store::WeightStore;

/// Clones share the same underlying maps.
#[derive(Debug, Default, Clone)]
pub struct MemoryWeightStore {
    weights: Arc<RwLock<BTreeMap<(PeriodId, UserId), DividendWeightRecord>>>,
    payouts: Arc<RwLock<BTreeMap<(PeriodId, UserId), Amount>>>,
}

impl MemoryWeightStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WeightStore for MemoryWeightStore {
    fn put_weight(&self, record: &DividendWeightRecord) -> DividendResult<()> {
        self.weights
            .write()
            .insert((record.period, record.user), *record);
        Ok(())
    }

    fn weight(&self, user: UserId, period: PeriodId) -> DividendResult<Option<DividendWeightRecord>> {
        Ok(self.weights.read().get(&(period, user)).copied())
    }

    fn weights_for(&self, period: PeriodId) -> DividendResult<Vec<DividendWeightRecord>> {
        Ok(self
            .weights
            .read()
            .iter()
            .filter(|((p, _), _)| *p == period)
            .map(|(_, record)| *record)
            .collect())
    }

    fn mark_payout(&self, period: PeriodId, user: UserId, amount: Amount) -> DividendResult<bool> {
        let mut payouts = self.payouts.write();
        if payouts.contains_key(&(period, user)) {
            return Ok(false);
        }
        payouts.insert((period, user), amount);
        Ok(true)
    }

    fn payout(&self, period: PeriodId, user: UserId) -> DividendResult<Option<Amount>> {
        Ok(self.payouts.read().get(&(period, user)).copied())
    }
}
