//! Settlement persistence backends

pub mod keys;
pub mod memory;
pub mod sled_store;

use lib_types::{Amount, PeriodId, UserId};

use crate::errors::SettlementResult;
use crate::record::DistributionRecord;

pub use memory::MemorySettlementStore;
pub use sled_store::SledSettlementStore;

/// Durable settlement state: one record per period plus per-(period, user)
/// payout marks that make interrupted batches resumable.
pub trait SettlementStore: Send + Sync {
    /// Persist the period's record if absent. Returns false and leaves the
    /// existing record untouched when the period is already settled.
    fn insert_record(&self, record: &DistributionRecord) -> SettlementResult<bool>;

    fn get_record(&self, period: PeriodId) -> SettlementResult<Option<DistributionRecord>>;

    /// Durably mark one applied payout. Returns false when already marked.
    fn mark_payout(&self, period: PeriodId, user: UserId, amount: Amount) -> SettlementResult<bool>;

    /// The recorded payout amount, if this user was already paid for the period
    fn payout(&self, period: PeriodId, user: UserId) -> SettlementResult<Option<Amount>>;

    /// Every applied payout of the period, ordered by user id
    fn payouts_for(&self, period: PeriodId) -> SettlementResult<Vec<(UserId, Amount)>>;
}
