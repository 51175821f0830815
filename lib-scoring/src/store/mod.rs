//! Snapshot persistence backends

pub mod keys;
pub mod memory;
pub mod sled_store;

use lib_types::{PeriodId, UserId};

use crate::errors::ScoringResult;
use crate::snapshot::ContributionSnapshot;

pub use memory::MemorySnapshotStore;
pub use sled_store::SledSnapshotStore;

/// Durable store of per-(user, period) contribution snapshots.
pub trait SnapshotStore: Send + Sync {
    /// Insert if absent. Returns false and leaves the stored snapshot
    /// untouched when (user, period) already has one.
    fn put(&self, snapshot: &ContributionSnapshot) -> ScoringResult<bool>;

    fn get(&self, user: UserId, period: PeriodId) -> ScoringResult<Option<ContributionSnapshot>>;

    /// Up to `limit` snapshots for `user` with period strictly before
    /// `before`, most recent first
    fn history(
        &self,
        user: UserId,
        before: PeriodId,
        limit: usize,
    ) -> ScoringResult<Vec<ContributionSnapshot>>;

    /// Users with at least one snapshot in the `periods` days strictly
    /// before `before`, in unspecified order without duplicates
    fn users_in_window(&self, before: PeriodId, periods: u32) -> ScoringResult<Vec<UserId>>;
}

/// True when `period` falls inside the trailing window: at least one day
/// and at most `periods` days before `before`.
pub(crate) fn in_window(period: PeriodId, before: PeriodId, periods: u32) -> bool {
    let days_ago = before.days_since(period);
    days_ago >= 1 && days_ago <= periods as i64
}
