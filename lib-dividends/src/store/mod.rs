//! Dividend persistence backends

pub mod keys;
pub mod memory;
pub mod sled_store;

use lib_types::{Amount, PeriodId, UserId};

use crate::errors::DividendResult;
use crate::record::DividendWeightRecord;

pub use memory::MemoryWeightStore;
pub use sled_store::SledWeightStore;

/// Durable dividend state: weight records keyed by (period, user) with
/// replace-on-recompute semantics, plus payout marks that make interrupted
/// distributions resumable.
pub trait WeightStore: Send + Sync {
    /// Upsert: a recomputation for the same (user, period) replaces the
    /// prior record rather than duplicating it
    fn put_weight(&self, record: &DividendWeightRecord) -> DividendResult<()>;

    fn weight(&self, user: UserId, period: PeriodId) -> DividendResult<Option<DividendWeightRecord>>;

    /// Every weight record for the period, ordered by user id
    fn weights_for(&self, period: PeriodId) -> DividendResult<Vec<DividendWeightRecord>>;

    /// Durably mark one applied dividend payout. Returns false when already
    /// marked.
    fn mark_payout(&self, period: PeriodId, user: UserId, amount: Amount) -> DividendResult<bool>;

    /// The recorded payout amount, if this user already received the
    /// period's dividend
    fn payout(&self, period: PeriodId, user: UserId) -> DividendResult<Option<Amount>>;
}
