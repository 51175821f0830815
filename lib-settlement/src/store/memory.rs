//! In-memory settlement store for tests and ephemeral deployments

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

use lib_types::{Amount, PeriodId, UserId};

use crate::errors::SettlementResult;
use crate::record::DistributionRecord;
use crate::store::SettlementStore;

/// Clones share the same underlying maps.
#[derive(Debug, Default, Clone)]
pub struct MemorySettlementStore {
    records: Arc<RwLock<BTreeMap<PeriodId, DistributionRecord>>>,
    payouts: Arc<RwLock<BTreeMap<(PeriodId, UserId), Amount>>>,
}

impl MemorySettlementStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettlementStore for MemorySettlementStore {
    fn insert_record(&self, record: &DistributionRecord) -> SettlementResult<bool> {
        let mut records = self.records.write();
        if records.contains_key(&record.period) {
            return Ok(false);
        }
        records.insert(record.period, record.clone());
        Ok(true)
    }

    fn get_record(&self, period: PeriodId) -> SettlementResult<Option<DistributionRecord>> {
        Ok(self.records.read().get(&period).cloned())
    }

    fn mark_payout(&self, period: PeriodId, user: UserId, amount: Amount) -> SettlementResult<bool> {
        let mut payouts = self.payouts.write();
        if payouts.contains_key(&(period, user)) {
            return Ok(false);
        }
        payouts.insert((period, user), amount);
        Ok(true)
    }

    fn payout(&self, period: PeriodId, user: UserId) -> SettlementResult<Option<Amount>> {
        Ok(self.payouts.read().get(&(period, user)).copied())
    }

    fn payouts_for(&self, period: PeriodId) -> SettlementResult<Vec<(UserId, Amount)>> {
        Ok(self
            .payouts
            .read()
            .iter()
            .filter(|((p, _), _)| *p == period)
            .map(|((_, user), amount)| (*user, *amount))
            .collect())
    }
}
